//! Simulated processor.
//!
//! Processors are passive: they hold an identity and one cache line, and only
//! the bus reads or changes them. They never reference the bus, memory or
//! their peers.

use super::cache::CacheLine;
use crate::common::ProcessorId;

/// A processor and its private single-line cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Processor {
    id: ProcessorId,
    line: CacheLine,
}

impl Processor {
    /// Creates processor `id` with an empty cache line.
    pub const fn new(id: ProcessorId) -> Self {
        Self {
            id,
            line: CacheLine::new(),
        }
    }

    /// Stable processor id (its index in the bus roster).
    #[inline]
    pub const fn id(&self) -> ProcessorId {
        self.id
    }

    /// The processor's cache line.
    #[inline]
    pub const fn line(&self) -> &CacheLine {
        &self.line
    }

    /// Mutable access to the cache line, for the bus and peer policies.
    #[inline]
    pub fn line_mut(&mut self) -> &mut CacheLine {
        &mut self.line
    }
}
