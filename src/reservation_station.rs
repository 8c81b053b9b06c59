use std::fmt;

use crate::instructions::{Op, Reg, UnitClass};

/// result tag identifying "station `slot` of class `class`"; used as the
/// alias-table value and as the broadcast identifier on the common data bus.
/// Tags are transient, live only between issue and write-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class: UnitClass,
    pub slot: usize,
}
impl Tag {
    pub fn new(class: UnitClass, slot: usize) -> Self {
        Tag { class, slot }
    }
}
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.class.tag_prefix(), self.slot)
    }
}

/// where a resolved operand came from; the scheduler tracks readiness only,
/// never data values, so this is bookkeeping for the station dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrcValue {
    Reg(Reg),
    Imm(i32),
    Forwarded(Tag),
}

impl fmt::Display for SrcValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SrcValue::Reg(reg) => write!(f, "{reg}"),
            SrcValue::Imm(value) => write!(f, "#{value}"),
            SrcValue::Forwarded(tag) => write!(f, "<{tag}>"),
        }
    }
}

/// one source operand slot: at most one of {value, pending tag} at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrcOperand {
    None,
    Value(SrcValue),
    Pending(Tag),
}
impl fmt::Display for SrcOperand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SrcOperand::None => f.write_str("-"),
            SrcOperand::Value(value) => write!(f, "{value}"),
            SrcOperand::Pending(tag) => write!(f, "?{tag}"),
        }
    }
}
impl SrcOperand {
    pub fn is_pending(&self) -> bool {
        match self {
            SrcOperand::Pending(_) => true,
            _ => false,
        }
    }

    /// on broadcast: a matching pending tag becomes a forwarded value
    pub fn resolve(&mut self, tag: Tag) {
        if *self == SrcOperand::Pending(tag) {
            *self = SrcOperand::Value(SrcValue::Forwarded(tag));
        }
    }
}

/// scheduling state for one station slot; allocated at issue, populated one
/// cycle later at read-operands, released at write-back
#[derive(Debug, Clone)]
pub struct Station {
    pub occupied: bool,
    pub op: Option<Op>,
    pub dest: Option<Reg>,
    /// cycle of read-operands; dispatch arbitration prefers the smallest
    pub age: u64,
    /// cycle dispatch put this station on a unit; 0 means not yet scheduled
    pub start: i64,
    /// execution cycles left; -1 means waiting on operands
    pub remaining: i64,
    pub unit: Option<usize>,
    pub src_a: SrcOperand,
    pub src_b: SrcOperand,
}
impl Station {
    pub fn idle() -> Self {
        Station {
            occupied: false,
            op: None,
            dest: None,
            age: 0,
            start: 0,
            remaining: 0,
            unit: None,
            src_a: SrcOperand::None,
            src_b: SrcOperand::None,
        }
    }

    pub fn is_operand_ready(&self) -> bool {
        self.occupied
            && self.op.is_some()
            && !self.src_a.is_pending()
            && !self.src_b.is_pending()
    }

    /// ready for dispatch: operands resolved but no functional unit yet
    pub fn is_dispatchable(&self) -> bool {
        self.is_operand_ready() && self.unit.is_none()
    }

    /// finished executing and was actually scheduled at some point
    pub fn is_complete(&self) -> bool {
        self.occupied && self.remaining == 0 && self.start > 0
    }

    pub fn release(&mut self) {
        *self = Self::idle();
    }
}

/// fixed-capacity pool of reservation stations for one class
#[derive(Debug, Clone)]
pub struct StationPool {
    pub class: UnitClass,
    pub stations: Vec<Station>,
}
impl StationPool {
    pub fn new(class: UnitClass, capacity: usize) -> Self {
        StationPool {
            class,
            stations: vec![Station::idle(); capacity],
        }
    }

    /// lowest-indexed free slot, marked occupied; None means the caller stalls
    pub fn allocate(&mut self) -> Option<usize> {
        for (slot, station) in self.stations.iter_mut().enumerate() {
            if !station.occupied {
                station.occupied = true;
                return Some(slot);
            }
        }

        return None;
    }

    pub fn any_occupied(&self) -> bool {
        self.stations.iter().any(|station| station.occupied)
    }

    /// broadcast a completed tag into this pool, resolving every matching
    /// pending operand
    pub fn resolve(&mut self, tag: Tag) {
        for station in self.stations.iter_mut() {
            station.src_a.resolve(tag);
            station.src_b.resolve(tag);
        }
    }

    /// the operand-ready, not-yet-scheduled station with the smallest age;
    /// ties go to the lowest slot index
    pub fn oldest_dispatchable(&self) -> Option<usize> {
        let mut oldest: Option<usize> = None;

        for (slot, station) in self.stations.iter().enumerate() {
            if !station.is_dispatchable() {
                continue;
            }
            match oldest {
                Some(best) if self.stations[best].age <= station.age => (),
                _ => oldest = Some(slot),
            }
        }

        return oldest;
    }
}
impl fmt::Display for StationPool {
    /// one line per occupied slot, for the trace-level station dump
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (slot, station) in self.stations.iter().enumerate() {
            if !station.occupied {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            first = false;

            match station.op {
                Some(op) => write!(
                    f,
                    "{}{} {} [{} {}] start={} rem={}",
                    self.class.tag_prefix(),
                    slot,
                    op,
                    station.src_a,
                    station.src_b,
                    station.start,
                    station.remaining
                )?,
                // allocated last cycle, operands not read yet
                None => write!(f, "{}{} (issued)", self.class.tag_prefix(), slot)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_station(age: u64) -> Station {
        let mut station = Station::idle();
        station.occupied = true;
        station.op = Some(Op::Add);
        station.age = age;
        station.src_a = SrcOperand::Value(SrcValue::Reg(Reg(0)));
        station.src_b = SrcOperand::Value(SrcValue::Reg(Reg(1)));
        station
    }

    #[test]
    fn allocate_picks_the_lowest_free_slot() {
        let mut pool = StationPool::new(UnitClass::Integer, 3);
        assert_eq!(pool.allocate(), Some(0));
        assert_eq!(pool.allocate(), Some(1));

        pool.stations[0].release();
        assert_eq!(pool.allocate(), Some(0));
        assert_eq!(pool.allocate(), Some(2));
        assert_eq!(pool.allocate(), None);
    }

    #[test]
    fn broadcast_resolves_matching_pending_operands_only() {
        let mut pool = StationPool::new(UnitClass::Integer, 2);
        let hit = Tag::new(UnitClass::Multiply, 0);
        let miss = Tag::new(UnitClass::Multiply, 1);

        pool.stations[0] = ready_station(1);
        pool.stations[0].src_a = SrcOperand::Pending(hit);
        pool.stations[0].src_b = SrcOperand::Pending(miss);

        pool.resolve(hit);
        assert_eq!(
            pool.stations[0].src_a,
            SrcOperand::Value(SrcValue::Forwarded(hit))
        );
        assert_eq!(pool.stations[0].src_b, SrcOperand::Pending(miss));
        assert!(!pool.stations[0].is_operand_ready());

        pool.resolve(miss);
        assert!(pool.stations[0].is_operand_ready());
    }

    #[test]
    fn oldest_dispatchable_prefers_smallest_age_not_slot_order() {
        let mut pool = StationPool::new(UnitClass::Integer, 3);
        pool.stations[0] = ready_station(9);
        pool.stations[1] = ready_station(4);
        pool.stations[2] = ready_station(7);

        assert_eq!(pool.oldest_dispatchable(), Some(1));

        // already scheduled stations are out of the running
        pool.stations[1].unit = Some(0);
        assert_eq!(pool.oldest_dispatchable(), Some(2));
    }

    #[test]
    fn station_dump_renders_tags_and_pending_operands() {
        let mut pool = StationPool::new(UnitClass::Multiply, 2);
        pool.stations[0] = ready_station(1);
        pool.stations[0].src_b = SrcOperand::Pending(Tag::new(UnitClass::Divide, 1));
        pool.stations[1].occupied = true;

        assert_eq!(
            pool.to_string(),
            "MULT0 ADD [R0 ?DIV1] start=0 rem=0, MULT1 (issued)"
        );
    }

    #[test]
    fn station_waiting_on_a_tag_is_not_dispatchable() {
        let mut station = ready_station(1);
        station.src_b = SrcOperand::Pending(Tag::new(UnitClass::Divide, 0));
        assert!(!station.is_dispatchable());
    }
}
