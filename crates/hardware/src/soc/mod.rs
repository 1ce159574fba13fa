//! System Components.
//!
//! This module organizes the shared side of the simulated system: the
//! coherence bus and the backing memory it owns.

/// Coherence bus, dispatch and state snapshot.
pub mod interconnect;

/// Shared backing memory.
pub mod memory;

pub use interconnect::{Bus, BusSnapshot, Dispatch, Outcome};
pub use memory::{SharedMemory, WordStatus};
