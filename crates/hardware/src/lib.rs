//! MESI/MOESI cache coherence bus simulator library.
//!
//! This crate replays memory instructions on a shared bus and counts how the caches behave:
//! 1. **Protocol:** Line states, the MESI/MOESI transition rules, and the peer-update hook.
//! 2. **Core:** Processors, each owning a single-slot cache line.
//! 3. **SoC:** Shared word memory and the bus that dispatches every instruction.
//! 4. **Simulation:** Workload generation and loading, the run loop, and the results file.
//! 5. **Statistics:** Instruction and miss counters with hit/miss rates.
//!
//! # Examples
//!
//! ```
//! use cohsim_core::{Bus, Instruction, LineState, ProtocolKind, SharedMemory};
//!
//! let mut bus = Bus::new(ProtocolKind::Mesi, 2, SharedMemory::new(4));
//! let _ = bus.dispatch(Instruction::write(0, 3, 42)).unwrap();
//! let read = bus.dispatch(Instruction::read(1, 3)).unwrap();
//!
//! assert_eq!(read.value, 42);
//! assert_eq!(read.state, LineState::Shared);
//! assert_eq!(bus.metrics().cache_misses, 2);
//! ```

/// Common types (addresses, processor ids, instructions, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Processors and their cache lines.
pub mod core;
/// Coherence protocols, transition rules and peer updates.
pub mod protocol;
/// Workloads, the simulation loop and results files.
pub mod sim;
/// Shared memory and the coherence bus.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Instruction and error types used across the API.
pub use crate::common::{Instruction, SimError};
/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Protocol selection and line states.
pub use crate::protocol::{LineState, ProtocolKind};
/// Top-level simulator and protocol comparison.
pub use crate::sim::{Comparison, RunSummary, Simulator, Workload, compare};
/// Bus and shared memory.
pub use crate::soc::{Bus, SharedMemory};
/// Run counters.
pub use crate::stats::Metrics;
