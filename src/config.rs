use serde::Deserialize;

use crate::error::SimError;
use crate::instructions::{Instruction, UnitClass};

/// per-class resources: functional unit count, reservation station count,
/// execution latency in cycles (field names match the configuration file)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClassConfig {
    pub number: usize,
    pub resnumber: usize,
    pub latency: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimConfig {
    pub integer: ClassConfig,
    pub divider: ClassConfig,
    pub multiplier: ClassConfig,
    pub load: ClassConfig,
    pub store: ClassConfig,
}
impl SimConfig {
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let config = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn class(&self, class: UnitClass) -> ClassConfig {
        match class {
            UnitClass::Integer => self.integer,
            UnitClass::Divide => self.divider,
            UnitClass::Multiply => self.multiplier,
            UnitClass::Load => self.load,
            UnitClass::Store => self.store,
        }
    }

    /// A class the trace never touches may be all zeros, but an instruction
    /// of a class with no stations or no units could never issue or dispatch
    /// and the run would stall forever. Catch that before the loop starts.
    pub fn validate_for(&self, instructions: &[Instruction]) -> Result<(), SimError> {
        for class in UnitClass::ALL {
            let used = instructions.iter().any(|inst| inst.class() == class);
            if !used {
                continue;
            }

            let cfg = self.class(class);
            if cfg.number == 0 || cfg.resnumber == 0 {
                return Err(SimError::UnusableClass {
                    class,
                    units: cfg.number,
                    stations: cfg.resnumber,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::instructions::{Op, Reg};

    fn config_json() -> &'static str {
        r#"{
            "integer":    {"number": 1, "resnumber": 2, "latency": 1},
            "divider":    {"number": 0, "resnumber": 0, "latency": 0},
            "multiplier": {"number": 0, "resnumber": 0, "latency": 0},
            "load":       {"number": 0, "resnumber": 0, "latency": 0},
            "store":      {"number": 0, "resnumber": 0, "latency": 0}
        }"#
    }

    #[test]
    fn parses_the_per_class_file_shape() {
        let config = SimConfig::from_json(config_json()).unwrap();
        assert_eq!(
            config.integer,
            ClassConfig {
                number: 1,
                resnumber: 2,
                latency: 1
            }
        );
        assert_eq!(config.divider.number, 0);
    }

    #[test]
    fn unused_zero_classes_are_fine() {
        let config = SimConfig::from_json(config_json()).unwrap();
        let trace = vec![
            Instruction::load_immediate(Op::LoadImmediateZero, Reg(0), 5),
            Instruction::halt(),
        ];
        assert!(config.validate_for(&trace).is_ok());
    }

    #[test]
    fn used_class_with_no_resources_is_rejected() {
        let config = SimConfig::from_json(config_json()).unwrap();
        let trace = vec![
            Instruction::three_reg(Op::Multiply, Reg(1), Reg(0), Reg(0)),
            Instruction::halt(),
        ];
        let err = config.validate_for(&trace).unwrap_err();
        assert!(matches!(
            err,
            SimError::UnusableClass {
                class: UnitClass::Multiply,
                ..
            }
        ));
    }
}
