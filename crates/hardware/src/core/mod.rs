//! Processor-side components.
//!
//! This module contains the per-processor state the bus operates on: the
//! single-slot cache line and the processor that owns it.

/// Single-slot cache line (state, tag, value).
pub mod cache;

/// Processor identity plus its cache line.
pub mod processor;

pub use self::cache::CacheLine;
pub use self::processor::Processor;
