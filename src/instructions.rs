use std::fmt;

/// number of architectural registers, R0 through R7
pub const NUM_REGS: usize = 8;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Reg(pub u8);
impl Reg {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// one functional-unit class: each has its own station pool, unit pool and latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    Integer,
    Divide,
    Multiply,
    Load,
    Store,
}
impl UnitClass {
    pub const ALL: [UnitClass; 5] = [
        UnitClass::Integer,
        UnitClass::Divide,
        UnitClass::Multiply,
        UnitClass::Load,
        UnitClass::Store,
    ];

    pub fn index(&self) -> usize {
        match self {
            UnitClass::Integer => 0,
            UnitClass::Divide => 1,
            UnitClass::Multiply => 2,
            UnitClass::Load => 3,
            UnitClass::Store => 4,
        }
    }

    pub fn tag_prefix(&self) -> &'static str {
        match self {
            UnitClass::Integer => "INT",
            UnitClass::Divide => "DIV",
            UnitClass::Multiply => "MULT",
            UnitClass::Load => "LD",
            UnitClass::Store => "STORE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    BitAnd,
    BitNor,
    Divide,
    Modulo,
    Exponent,
    Multiply,
    LoadWord,
    StoreWord,
    LoadImmediateZero,
    LoadImmediateSigned,
    LoadUpperImmediate,
    Put,
    Halt,
}
impl Op {
    pub fn class(&self) -> UnitClass {
        match self {
            Op::Add
            | Op::Subtract
            | Op::BitAnd
            | Op::BitNor
            | Op::LoadImmediateZero
            | Op::LoadImmediateSigned
            | Op::LoadUpperImmediate
            | Op::Put
            | Op::Halt => UnitClass::Integer,
            Op::Divide | Op::Modulo | Op::Exponent => UnitClass::Divide,
            Op::Multiply => UnitClass::Multiply,
            Op::LoadWord => UnitClass::Load,
            Op::StoreWord => UnitClass::Store,
        }
    }

    /// whether this op binds its destination register to a result tag at read-operands
    pub fn writes_destination(&self) -> bool {
        match self {
            Op::StoreWord | Op::Put | Op::Halt => false,
            _ => true,
        }
    }

    pub fn is_halt(&self) -> bool {
        *self == Op::Halt
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Add => "ADD",
            Op::Subtract => "SUB",
            Op::BitAnd => "AND",
            Op::BitNor => "NOR",
            Op::Divide => "DIV",
            Op::Modulo => "MOD",
            Op::Exponent => "EXP",
            Op::Multiply => "MUL",
            Op::LoadWord => "LW",
            Op::StoreWord => "SW",
            Op::LoadImmediateZero => "LIZ",
            Op::LoadImmediateSigned => "LIS",
            Op::LoadUpperImmediate => "LUI",
            Op::Put => "PUT",
            Op::Halt => "HALT",
        }
    }
}
impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// a source operand as decoded: either an architectural register or a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(i32),
}

/// one decoded instruction; immutable once parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub dest: Option<Reg>,
    pub src_a: Option<Operand>,
    pub src_b: Option<Operand>,
}
impl Instruction {
    pub fn class(&self) -> UnitClass {
        self.op.class()
    }

    /// ADD/SUB/AND/NOR/DIV/MOD/EXP/MUL: dest, two register sources
    pub fn three_reg(op: Op, dest: Reg, left: Reg, right: Reg) -> Self {
        Instruction {
            op,
            dest: Some(dest),
            src_a: Some(Operand::Reg(left)),
            src_b: Some(Operand::Reg(right)),
        }
    }

    /// LW: dest, address register
    pub fn load(dest: Reg, address: Reg) -> Self {
        Instruction {
            op: Op::LoadWord,
            dest: Some(dest),
            src_a: Some(Operand::Reg(address)),
            src_b: None,
        }
    }

    /// SW: value register, address register; writes no destination
    pub fn store(value: Reg, address: Reg) -> Self {
        Instruction {
            op: Op::StoreWord,
            dest: None,
            src_a: Some(Operand::Reg(value)),
            src_b: Some(Operand::Reg(address)),
        }
    }

    /// LIZ/LIS/LUI: dest, immediate (no register source, so no register read)
    pub fn load_immediate(op: Op, dest: Reg, immediate: i32) -> Self {
        Instruction {
            op,
            dest: Some(dest),
            src_a: Some(Operand::Imm(immediate)),
            src_b: None,
        }
    }

    /// PUT: single register source, no destination
    pub fn put(src: Reg) -> Self {
        Instruction {
            op: Op::Put,
            dest: None,
            src_a: Some(Operand::Reg(src)),
            src_b: None,
        }
    }

    pub fn halt() -> Self {
        Instruction {
            op: Op::Halt,
            dest: None,
            src_a: None,
            src_b: None,
        }
    }
}
