//! Shared backing memory.
//!
//! This module implements the single memory all caches sit in front of. It provides:
//! 1. **Words:** A flat, fixed-size array of `i64` words indexed by [`Addr`].
//! 2. **Status:** A clean/dirty tag per word, set dirty by every write.
//! 3. **Initialisation:** Zero-filled, from explicit contents, or seeded random contents.
//!
//! Writes are write-through: the bus stores into memory on every write, and the
//! dirty tag is recorded but never gates anything.

use std::fmt;

use rand::Rng;

use crate::common::Addr;

/// Upper bound (inclusive) of randomly initialised word values.
pub const RANDOM_WORD_MAX: i64 = 1000;

/// Clean/dirty status of a memory word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WordStatus {
    /// Never written during this run.
    #[default]
    Clean,
    /// Written at least once during this run.
    Dirty,
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("clean"),
            Self::Dirty => f.write_str("dirty"),
        }
    }
}

/// Flat word memory with per-word status.
///
/// The size is fixed at construction. Every in-range address always has a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedMemory {
    words: Vec<i64>,
    status: Vec<WordStatus>,
}

impl SharedMemory {
    /// Creates `size` zeroed, clean words.
    pub fn new(size: usize) -> Self {
        Self::from_words(vec![0; size])
    }

    /// Creates memory holding exactly `words`, all clean.
    pub fn from_words(words: Vec<i64>) -> Self {
        let status = vec![WordStatus::Clean; words.len()];
        Self { words, status }
    }

    /// Creates `size` clean words with values drawn uniformly from `0..=RANDOM_WORD_MAX`.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let words = (0..size).map(|_| rng.gen_range(0..=RANDOM_WORD_MAX)).collect();
        Self::from_words(words)
    }

    /// Number of words.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the memory has no words.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reads the word at `addr`, or `None` when out of range.
    #[inline]
    pub fn read(&self, addr: Addr) -> Option<i64> {
        self.words.get(addr.val()).copied()
    }

    /// Status of the word at `addr`, or `None` when out of range.
    #[inline]
    pub fn status(&self, addr: Addr) -> Option<WordStatus> {
        self.status.get(addr.val()).copied()
    }

    /// Writes `value` at `addr` and marks the word dirty.
    ///
    /// Returns `false` (and changes nothing) when `addr` is out of range.
    pub fn write(&mut self, addr: Addr, value: i64) -> bool {
        match (
            self.words.get_mut(addr.val()),
            self.status.get_mut(addr.val()),
        ) {
            (Some(word), Some(status)) => {
                *word = value;
                *status = WordStatus::Dirty;
                true
            }
            _ => false,
        }
    }

    /// All words, in address order.
    pub fn words(&self) -> &[i64] {
        &self.words
    }

    /// All status tags, in address order.
    pub fn statuses(&self) -> &[WordStatus] {
        &self.status
    }
}
