//! Simulation driver.
//!
//! Provides the workload sources, the run loop that feeds them to the bus,
//! and reading and writing of results files.

/// Results file output and parsing.
pub mod report;
/// Top-level simulator and protocol comparison.
pub mod simulator;
/// Instruction workloads and the seeded generator.
pub mod workload;

pub use report::{ResultRecord, parse_results, persist_results, read_results, write_results};
pub use simulator::{Comparison, RunSummary, Simulator, compare, resolve_seed};
pub use workload::{Workload, WorkloadGenerator};
