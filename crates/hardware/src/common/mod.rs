//! Common types used throughout the coherence simulator.
//!
//! This module provides fundamental building blocks shared by every component:
//! 1. **Index Types:** Strong types for word addresses and processor ids.
//! 2. **Memory Access:** Read/write classification of workload instructions.
//! 3. **Error Handling:** Configuration, workload and umbrella error types.

/// Address and processor id definitions.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{Addr, ProcessorId};
pub use data::{AccessType, Instruction};
pub use error::{ConfigError, SimError, WorkloadError};
