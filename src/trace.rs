use crate::error::SimError;
use crate::instructions::{Instruction, Op, Reg, NUM_REGS};

/// Parses a decoded mnemonic trace: a whitespace-delimited token stream of
/// `OPCODE arg1 [arg2 [arg3]]` groups, terminated by `HALT`. Reading stops at
/// the HALT token; anything after it never reaches the scheduler.
///
/// Unrecognized opcodes are skipped unless `strict` is set.
pub fn parse_trace(text: &str, strict: bool) -> Result<Vec<Instruction>, SimError> {
    let mut tokens = text.split_whitespace();
    let mut instructions = Vec::new();

    while let Some(op) = tokens.next() {
        match op {
            "ADD" | "SUB" | "AND" | "NOR" | "DIV" | "MOD" | "EXP" | "MUL" => {
                let parsed = match op {
                    "ADD" => Op::Add,
                    "SUB" => Op::Subtract,
                    "AND" => Op::BitAnd,
                    "NOR" => Op::BitNor,
                    "DIV" => Op::Divide,
                    "MOD" => Op::Modulo,
                    "EXP" => Op::Exponent,
                    _ => Op::Multiply,
                };
                let rd = p_reg(arg(&mut tokens, op, 3)?)?;
                let rs = p_reg(arg(&mut tokens, op, 3)?)?;
                let rt = p_reg(arg(&mut tokens, op, 3)?)?;
                instructions.push(Instruction::three_reg(parsed, rd, rs, rt));
            }
            "LW" => {
                let rd = p_reg(arg(&mut tokens, op, 2)?)?;
                let rs = p_reg(arg(&mut tokens, op, 2)?)?;
                instructions.push(Instruction::load(rd, rs));
            }
            "SW" => {
                let rt = p_reg(arg(&mut tokens, op, 2)?)?;
                let rs = p_reg(arg(&mut tokens, op, 2)?)?;
                instructions.push(Instruction::store(rt, rs));
            }
            "LIZ" | "LIS" | "LUI" => {
                let parsed = match op {
                    "LIZ" => Op::LoadImmediateZero,
                    "LIS" => Op::LoadImmediateSigned,
                    _ => Op::LoadUpperImmediate,
                };
                let rd = p_reg(arg(&mut tokens, op, 2)?)?;
                let imm = p_i32(arg(&mut tokens, op, 2)?)?;
                instructions.push(Instruction::load_immediate(parsed, rd, imm));
            }
            "PUT" => {
                let rs = p_reg(arg(&mut tokens, op, 1)?)?;
                instructions.push(Instruction::put(rs));
            }
            "HALT" => {
                instructions.push(Instruction::halt());
                break;
            }
            unknown => {
                if strict {
                    return Err(SimError::UnknownOpcode(unknown.to_string()));
                }
                tracing::warn!(opcode = unknown, "skipping unrecognized opcode");
            }
        }
    }

    return Ok(instructions);
}

fn arg<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    op: &str,
    expected: usize,
) -> Result<&'a str, SimError> {
    tokens.next().ok_or_else(|| SimError::MissingOperand {
        op: op.to_string(),
        expected,
    })
}

fn p_reg(token: &str) -> Result<Reg, SimError> {
    let bad = || SimError::BadRegister(token.to_string());

    let number: u8 = token
        .strip_prefix('R')
        .ok_or_else(bad)?
        .parse()
        .map_err(|_| bad())?;

    if (number as usize) < NUM_REGS {
        Ok(Reg(number))
    } else {
        Err(bad())
    }
}

fn p_i32(token: &str) -> Result<i32, SimError> {
    token
        .parse()
        .map_err(|_| SimError::BadImmediate(token.to_string()))
}
