use crate::instructions::UnitClass;

/// one execution resource: a busy flag and a completed-instruction counter
#[derive(Debug, Clone)]
pub struct FunctionalUnit {
    pub busy: bool,
    pub completed: u64,
}
impl FunctionalUnit {
    pub fn new() -> Self {
        FunctionalUnit {
            busy: false,
            completed: 0,
        }
    }
}

/// fixed pool of functional units for one class, with that class's latency
#[derive(Debug, Clone)]
pub struct UnitPool {
    pub class: UnitClass,
    pub units: Vec<FunctionalUnit>,
    pub latency: u64,
}
impl UnitPool {
    pub fn new(class: UnitClass, count: usize, latency: u64) -> Self {
        UnitPool {
            class,
            units: vec![FunctionalUnit::new(); count],
            latency,
        }
    }

    /// marks the unit busy and counts the completion; the counter moves at
    /// successful dispatch, not at write-back
    pub fn try_acquire(&mut self, unit: usize) -> bool {
        if self.units[unit].busy {
            return false;
        }

        self.units[unit].busy = true;
        self.units[unit].completed += 1;
        return true;
    }

    pub fn release(&mut self, unit: usize) {
        self.units[unit].busy = false;
    }
}
