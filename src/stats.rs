use std::fmt::{self, Display};

use serde::Serialize;

use crate::functional_units::UnitPool;
use crate::instructions::UnitClass;

/// counters accumulated by the scheduler over one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTracker {
    pub cycles: u64,
    pub register_reads: u64,
    pub stalls: u64,
    pub instructions_issued: u64,
    pub instructions_retired: u64,
}
impl StatsTracker {
    pub fn new() -> Self {
        Self {
            cycles: 0,
            register_reads: 0,
            stalls: 0,
            instructions_issued: 0,
            instructions_retired: 0,
        }
    }
}
impl Display for StatsTracker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Run stats:")?;
        writeln!(f, " - Clock Cycles: {}", self.cycles)?;
        writeln!(f, " - Instructions Issued: {}", self.instructions_issued)?;
        writeln!(f, " - Instructions Retired: {}", self.instructions_retired)?;
        writeln!(f, " - Register Reads: {}", self.register_reads)?;
        writeln!(f, " - Pipeline Stalls: {}", self.stalls)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub id: usize,
    pub instructions: u64,
}

/// the structured output sink: aggregate counters plus per-unit completion
/// counts, keyed exactly as the report file format expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimReport {
    pub cycles: u64,
    pub integer: Vec<UnitReport>,
    pub multiplier: Vec<UnitReport>,
    pub divider: Vec<UnitReport>,
    pub store: Vec<UnitReport>,
    pub load: Vec<UnitReport>,
    #[serde(rename = "reg reads")]
    pub reg_reads: u64,
    pub stalls: u64,
}
impl SimReport {
    pub fn new(stats: &StatsTracker, unit_pools: &[UnitPool]) -> Self {
        let per_class = |class: UnitClass| -> Vec<UnitReport> {
            unit_pools
                .iter()
                .filter(|pool| pool.class == class)
                .flat_map(|pool| pool.units.iter().enumerate())
                .map(|(id, unit)| UnitReport {
                    id,
                    instructions: unit.completed,
                })
                .collect()
        };

        SimReport {
            cycles: stats.cycles,
            integer: per_class(UnitClass::Integer),
            multiplier: per_class(UnitClass::Multiply),
            divider: per_class(UnitClass::Divide),
            store: per_class(UnitClass::Store),
            load: per_class(UnitClass::Load),
            reg_reads: stats.register_reads,
            stalls: stats.stalls,
        }
    }

    pub fn to_json(&self) -> String {
        // serialization of this shape cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn report_keys_match_the_report_file_format() {
        let mut stats = StatsTracker::new();
        stats.cycles = 10;
        stats.register_reads = 1;
        stats.stalls = 2;

        let mut pools = vec![
            UnitPool::new(UnitClass::Integer, 1, 1),
            UnitPool::new(UnitClass::Divide, 0, 0),
            UnitPool::new(UnitClass::Multiply, 0, 0),
            UnitPool::new(UnitClass::Load, 0, 0),
            UnitPool::new(UnitClass::Store, 0, 0),
        ];
        pools[0].units[0].completed = 4;

        let report = SimReport::new(&stats, &pools);
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();

        assert_eq!(json["cycles"], 10);
        assert_eq!(json["reg reads"], 1);
        assert_eq!(json["stalls"], 2);
        assert_eq!(json["integer"][0]["id"], 0);
        assert_eq!(json["integer"][0]["instructions"], 4);
        assert_eq!(json["divider"].as_array().unwrap().len(), 0);
    }
}
