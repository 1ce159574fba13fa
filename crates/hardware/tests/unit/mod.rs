//! # Unit Components
//!
//! Tests for each simulator component, from the protocol rules through the
//! bus to whole runs and their results files.


/// Configuration defaults, JSON loading and validation.
pub mod config;

/// Property tests over arbitrary in-bounds workloads.
pub mod properties;



/// Simulation loop, history and protocol comparison.
pub mod simulator;

/// Unit tests for run statistics.
///
/// Ensures the [`Metrics`](cohsim_core::stats::Metrics) counters produce the
/// right derived rates and report text, including for empty runs.
pub mod stats_verification;
