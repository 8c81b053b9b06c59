use crate::instructions::{Reg, NUM_REGS};
use crate::reservation_station::Tag;

/// Maps each architectural register to the in-flight station that will
/// produce its next value. An empty entry means the committed value is
/// available and reading it counts as a register read.
#[derive(Debug, Clone)]
pub struct RegisterAliasTable {
    pub table: [Option<Tag>; NUM_REGS],
}
impl RegisterAliasTable {
    pub fn new() -> Self {
        Self {
            table: [None; NUM_REGS],
        }
    }

    pub fn lookup(&self, reg: Reg) -> Option<Tag> {
        self.table[reg.index()]
    }

    /// newest producer wins: in-order issue means a later bind simply
    /// overwrites the mapping
    pub fn bind(&mut self, reg: Reg, tag: Tag) {
        self.table[reg.index()] = Some(tag);
    }

    /// clears the mapping only if it still holds `tag`, so a retiring
    /// station cannot wipe out a newer producer of the same register
    pub fn unbind(&mut self, reg: Reg, tag: Tag) {
        if self.table[reg.index()] == Some(tag) {
            self.table[reg.index()] = None;
        }
    }
}
