//! Cycle-accurate simulation of Tomasulo's dynamic instruction scheduling
//! algorithm: bounded reservation station pools per functional-unit class,
//! register renaming through an alias table, a broadcast result bus and an
//! issue / read-operands / execute / write-back clock loop with oldest-first
//! arbitration. Only scheduling is modeled, never data values or control
//! flow: the input trace is a fixed linear sequence of decoded mnemonics.

pub mod config;
pub mod error;
pub mod functional_units;
pub mod instructions;
pub mod register_alias_table;
pub mod reservation_station;
pub mod scheduler;
pub mod stats;
pub mod trace;

pub use config::SimConfig;
pub use error::SimError;
pub use scheduler::Scheduler;
pub use stats::{SimReport, StatsTracker};
pub use trace::parse_trace;
