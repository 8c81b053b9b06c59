use tracing::{debug, trace};

use crate::config::SimConfig;
use crate::functional_units::UnitPool;
use crate::instructions::{Instruction, Operand, UnitClass};
use crate::register_alias_table::RegisterAliasTable;
use crate::reservation_station::{SrcOperand, SrcValue, StationPool, Tag};
use crate::stats::{SimReport, StatsTracker};

/// an instruction issued last cycle, waiting for its read-operands step
#[derive(Debug, Clone, Copy)]
struct PendingRead {
    inst: usize,
    tag: Tag,
}

/// The cycle-stepping control loop. Owns every pool, the alias table and the
/// counters; nothing else holds mutable references into them.
pub struct Scheduler {
    instructions: Vec<Instruction>,
    next_inst: usize,
    pending_read: Option<PendingRead>,
    keep_issue: bool,
    clock: u64,
    pub rat: RegisterAliasTable,
    pub station_pools: Vec<StationPool>,
    pub unit_pools: Vec<UnitPool>,
    pub stats: StatsTracker,
}
impl Scheduler {
    pub fn new(config: &SimConfig, instructions: Vec<Instruction>) -> Self {
        let mut station_pools = Vec::new();
        let mut unit_pools = Vec::new();

        for class in UnitClass::ALL {
            let class_config = config.class(class);
            station_pools.push(StationPool::new(class, class_config.resnumber));
            unit_pools.push(UnitPool::new(class, class_config.number, class_config.latency));
        }

        Scheduler {
            instructions,
            next_inst: 0,
            pending_read: None,
            keep_issue: true,
            clock: 0,
            rat: RegisterAliasTable::new(),
            station_pools,
            unit_pools,
            stats: StatsTracker::new(),
        }
    }

    pub fn run(&mut self) -> SimReport {
        loop {
            self.cycle();
            if self.is_finished() {
                break;
            }
        }

        self.stats.cycles = self.clock;
        debug!(cycles = self.clock, "simulation finished");

        return SimReport::new(&self.stats, &self.unit_pools);
    }

    /// One clock cycle. The phase order is load-bearing: write-back must be
    /// visible to this cycle's dispatch, and a newly issued instruction reads
    /// its operands one cycle after issue.
    pub fn cycle(&mut self) {
        trace!(clock = self.clock, "cycle");

        self.read_operands();
        self.write_back();
        self.dispatch_all();
        self.issue();
        self.advance_execution();

        for pool in self.station_pools.iter().filter(|pool| pool.any_occupied()) {
            trace!(stations = %pool, "station dump");
        }

        self.clock += 1;
        self.stats.cycles = self.clock;
    }

    pub fn is_finished(&self) -> bool {
        !self.station_pools.iter().any(|pool| pool.any_occupied())
    }

    /// Fills in the station allocated last cycle: op, age, operands resolved
    /// through the alias table. A fully resolved station tries to dispatch at
    /// once; destination renaming binds last so that an op reading and
    /// writing the same register sees the previous producer.
    fn read_operands(&mut self) {
        let pending = match self.pending_read.take() {
            Some(pending) => pending,
            None => return,
        };

        let inst = self.instructions[pending.inst];
        let class = pending.tag.class;

        let src_a = self.resolve_operand(inst.src_a);
        let src_b = self.resolve_operand(inst.src_b);
        let ready = !src_a.is_pending() && !src_b.is_pending();

        let station = &mut self.station_pools[class.index()].stations[pending.tag.slot];
        station.op = Some(inst.op);
        station.dest = inst.dest;
        station.age = self.clock;
        station.src_a = src_a;
        station.src_b = src_b;

        if ready {
            self.dispatch_class(class);
        } else {
            let station = &mut self.station_pools[class.index()].stations[pending.tag.slot];
            station.remaining = -1;
            station.start = -1;
        }

        if inst.op.writes_destination() {
            if let Some(dest) = inst.dest {
                self.rat.bind(dest, pending.tag);
            }
        }

        trace!(op = %inst.op, tag = %pending.tag, ready, "read operands");
    }

    fn resolve_operand(&mut self, operand: Option<Operand>) -> SrcOperand {
        match operand {
            None => SrcOperand::None,
            Some(Operand::Imm(value)) => SrcOperand::Value(SrcValue::Imm(value)),
            Some(Operand::Reg(reg)) => match self.rat.lookup(reg) {
                Some(tag) => SrcOperand::Pending(tag),
                None => {
                    // architecturally available: read the committed value
                    self.stats.register_reads += 1;
                    SrcOperand::Value(SrcValue::Reg(reg))
                }
            },
        }
    }

    /// Every completed station broadcasts this cycle; there is no common data
    /// bus arbitration. Multi-broadcast and a textbook one-result-per-cycle
    /// bus differ in cycle counts on contending traces.
    fn write_back(&mut self) {
        for class in UnitClass::ALL {
            for slot in 0..self.station_pools[class.index()].stations.len() {
                if self.station_pools[class.index()].stations[slot].is_complete() {
                    self.broadcast(Tag::new(class, slot));
                }
            }
        }
    }

    fn broadcast(&mut self, tag: Tag) {
        for pool in self.station_pools.iter_mut() {
            pool.resolve(tag);
        }

        let station = &mut self.station_pools[tag.class.index()].stations[tag.slot];
        let op = station.op;
        let dest = station.dest;
        let unit = station.unit;
        station.release();

        if let Some(unit) = unit {
            self.unit_pools[tag.class.index()].release(unit);
        }

        // identity-checked: a newer producer of the same register survives
        if let Some(dest) = dest {
            self.rat.unbind(dest, tag);
        }

        if op.map_or(false, |op| op.is_halt()) {
            self.keep_issue = false;
            debug!("halt retired, issue stopped");
        }

        self.stats.instructions_retired += 1;
        debug!(%tag, "write-back broadcast");
    }

    fn dispatch_all(&mut self) {
        for class in UnitClass::ALL {
            self.dispatch_class(class);
        }
    }

    /// For each free unit, schedule the oldest operand-ready station that has
    /// no unit yet. FIFO by age, not by slot index.
    fn dispatch_class(&mut self, class: UnitClass) {
        let latency = self.unit_pools[class.index()].latency;

        for unit in 0..self.unit_pools[class.index()].units.len() {
            let slot = match self.station_pools[class.index()].oldest_dispatchable() {
                Some(slot) => slot,
                None => break,
            };

            if !self.unit_pools[class.index()].try_acquire(unit) {
                continue;
            }

            let station = &mut self.station_pools[class.index()].stations[slot];
            station.start = self.clock as i64;
            station.remaining = latency as i64;
            station.unit = Some(unit);

            debug!(tag = %Tag::new(class, slot), unit, latency, "dispatch");
        }
    }

    /// Allocation failure here is the backpressure mechanism, counted as a
    /// stall rather than reported as an error.
    fn issue(&mut self) {
        if !self.keep_issue || self.next_inst >= self.instructions.len() {
            return;
        }

        let class = self.instructions[self.next_inst].class();
        match self.station_pools[class.index()].allocate() {
            Some(slot) => {
                let tag = Tag::new(class, slot);
                self.pending_read = Some(PendingRead {
                    inst: self.next_inst,
                    tag,
                });
                self.next_inst += 1;
                self.stats.instructions_issued += 1;
                debug!(inst = self.next_inst - 1, %tag, "issue");
            }
            None => {
                self.stats.stalls += 1;
                debug!(inst = self.next_inst, "stall: no free reservation station");
            }
        }
    }

    /// Stations dispatched in an earlier cycle burn one execution cycle.
    fn advance_execution(&mut self) {
        for pool in self.station_pools.iter_mut() {
            for station in pool.stations.iter_mut() {
                if station.remaining > 0 && station.start < self.clock as i64 {
                    station.remaining -= 1;
                }
            }
        }
    }
}
