//! Single-slot cache line.
//!
//! Each processor owns exactly one line: there are no sets and no ways. The
//! line is keyed by its tag (the resident word address), so a lookup compares
//! tags exactly as a set-associative cache would with a single way. It models:
//! 1. **Lookup:** Miss/hit resolution against the resident tag and state.
//! 2. **Fill:** Re-tagging on a miss; the previous contents are dropped without write-back.
//! 3. **Update:** In-place value/state changes on hits and peer invalidation.

use crate::common::Addr;
use crate::protocol::LineState;
use crate::protocol::transitions;

/// One cache line: state, resident address and cached value.
///
/// An empty line (`tag == None`) is always `Invalid`. The converse does not
/// hold: an invalidated line keeps its tag until the next fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    state: LineState,
    tag: Option<Addr>,
    value: i64,
}

impl CacheLine {
    /// Creates an empty, `Invalid` line.
    pub const fn new() -> Self {
        Self {
            state: LineState::Invalid,
            tag: None,
            value: 0,
        }
    }

    /// Current coherence state.
    #[inline]
    pub const fn state(&self) -> LineState {
        self.state
    }

    /// Resident address, if the line has ever been filled.
    #[inline]
    pub const fn tag(&self) -> Option<Addr> {
        self.tag
    }

    /// Cached value.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Returns `true` if an access to `addr` misses this line.
    #[inline]
    pub fn is_miss(&self, addr: Addr) -> bool {
        transitions::is_miss(self.state, self.tag, addr)
    }

    /// Returns `true` if the line is tagged with `addr`, whatever its state.
    #[inline]
    pub fn holds(&self, addr: Addr) -> bool {
        self.tag == Some(addr)
    }

    /// Re-tags the line for `addr` with `value` loaded from memory.
    ///
    /// Whatever was resident is discarded; there is no write-back check.
    pub fn fill(&mut self, addr: Addr, value: i64, state: LineState) {
        self.tag = Some(addr);
        self.value = value;
        self.state = state;
    }

    /// Stores `value` into the resident line and moves it to `state`.
    pub fn store(&mut self, value: i64, state: LineState) {
        self.value = value;
        self.state = state;
    }

    /// Marks the line `Invalid`, keeping its tag and value.
    ///
    /// Returns `true` if the line was valid before.
    pub fn invalidate(&mut self) -> bool {
        let was_valid = self.state != LineState::Invalid;
        self.state = LineState::Invalid;
        was_valid
    }
}
