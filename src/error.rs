use thiserror::Error;

use crate::instructions::UnitClass;

/// everything that can stop a run before the scheduling loop starts;
/// the loop itself has no recoverable errors (stalls are state, not failures)
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unknown opcode {0:?} in trace")]
    UnknownOpcode(String),

    #[error("{op} expects {expected} operands, trace ended early")]
    MissingOperand { op: String, expected: usize },

    #[error("bad register name {0:?} (expected R0..R7)")]
    BadRegister(String),

    #[error("bad immediate {0:?}")]
    BadImmediate(String),

    #[error("trace uses the {class:?} class but the configuration gives it {units} units and {stations} reservation stations")]
    UnusableClass {
        class: UnitClass,
        units: usize,
        stations: usize,
    },

    #[error("failed to write report to {path}: {source}")]
    Report {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
