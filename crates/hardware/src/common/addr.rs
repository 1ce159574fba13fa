//! Word address and processor identifier types.
//!
//! This module defines strong types for the two indices that flow through every
//! instruction. It provides the following:
//! 1. **Type Safety:** Keeps memory word addresses and processor ids from being mixed up.
//! 2. **Bounds Checks:** Helpers that check an index against the configured system size.
//! 3. **Display:** Plain decimal rendering used by trace events and the state dump.

use std::fmt;

/// A word address in shared memory.
///
/// Memory is a flat array of words, so an address is simply the word index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(pub usize);

/// Identifier of a simulated processor, equal to its index in the bus roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessorId(pub usize);

impl Addr {
    /// Creates a new address from a raw word index.
    #[inline(always)]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// Returns the raw word index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }

    /// Returns `true` if this address falls inside a memory of `words` words.
    #[inline]
    pub const fn in_bounds(self, words: usize) -> bool {
        self.0 < words
    }
}

impl ProcessorId {
    /// Creates a new processor id from a raw roster index.
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw roster index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }

    /// Returns `true` if this id names one of `processors` processors.
    #[inline]
    pub const fn in_bounds(self, processors: usize) -> bool {
        self.0 < processors
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
