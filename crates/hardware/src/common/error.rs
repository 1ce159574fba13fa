//! Error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Configuration Errors:** Rejected system sizes and unreadable configuration files.
//! 2. **Workload Errors:** Instructions that violate the configured bounds or cannot be parsed.
//! 3. **Umbrella Error:** `SimError`, returned by operations that touch more than one concern.
//!
//! An unknown protocol literal is deliberately absent: it falls back to MESI with a warning.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::addr::{Addr, ProcessorId};

/// Invalid simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The system must have at least one processor.
    #[error("processor count must be at least 1")]
    NoProcessors,

    /// Shared memory must hold at least one word.
    #[error("memory size must be at least 1 word")]
    NoMemory,

    /// Locality bias is a percentage.
    #[error("locality percentage {0} is above 100")]
    LocalityOutOfRange(u8),

    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration JSON is malformed.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An instruction the core refuses to execute.
///
/// Raised before any state is touched, so a rejected instruction leaves the bus unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    /// The instruction names a processor outside `[0, processors)`.
    #[error("instruction {index}: processor {processor} out of range (system has {processors})")]
    ProcessorOutOfRange {
        /// Position of the instruction in the workload.
        index: usize,
        /// Offending processor id.
        processor: ProcessorId,
        /// Configured processor count.
        processors: usize,
    },

    /// The instruction names an address outside `[0, words)`.
    #[error("instruction {index}: address {addr} out of range (memory has {words} words)")]
    AddressOutOfRange {
        /// Position of the instruction in the workload.
        index: usize,
        /// Offending address.
        addr: Addr,
        /// Configured memory size in words.
        words: usize,
    },

    /// Op code other than `0` (read) or `1` (write).
    #[error("invalid op code {0}, expected 0 (read) or 1 (write)")]
    InvalidOp(i64),

    /// A workload file line could not be parsed.
    #[error("workload line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Top-level simulator error.
#[derive(Debug, Error)]
pub enum SimError {
    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Bad workload.
    #[error(transparent)]
    Workload(#[from] WorkloadError),

    /// File I/O failure (workload or results file).
    #[error("{path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl SimError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
