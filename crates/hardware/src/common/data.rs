//! Memory Access Types.
//!
//! This module defines the classification of memory accesses carried by workload
//! instructions. These types are used for the following:
//! 1. **Dispatch:** Selecting the read or write step after miss/hit resolution.
//! 2. **Statistics Tracking:** Counting loads and stores separately.
//! 3. **Workload Encoding:** Mapping the integer op codes `0` and `1` of workload files.
//! 4. **Instructions:** The `(processor, op, address, value)` tuple replayed by the bus.

use std::fmt;

use super::addr::{Addr, ProcessorId};
use super::error::WorkloadError;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access (op code `0`).
    ///
    /// Resolves miss/hit and returns the line value; never changes state by itself.
    Read,

    /// Data write access (op code `1`).
    ///
    /// Stores the value into the line and, write-through, into shared memory.
    Write,
}

impl AccessType {
    /// Returns the integer op code used in workload tuples.
    pub const fn code(self) -> u8 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
        }
    }

    /// Returns `true` for writes.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl TryFrom<i64> for AccessType {
    type Error = WorkloadError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            other => Err(WorkloadError::InvalidOp(other)),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "reads"),
            Self::Write => write!(f, "writes"),
        }
    }
}

/// One workload element: `(processor_id, op, address, value)`.
///
/// `value` is only meaningful for writes; reads carry it along unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Processor that issues the access.
    pub processor: ProcessorId,
    /// Read or write.
    pub op: AccessType,
    /// Target word address.
    pub addr: Addr,
    /// Value to store (writes) or payload carried through (reads).
    pub value: i64,
}

impl Instruction {
    /// A read of `addr` by `processor`.
    pub const fn read(processor: usize, addr: usize) -> Self {
        Self {
            processor: ProcessorId(processor),
            op: AccessType::Read,
            addr: Addr(addr),
            value: 0,
        }
    }

    /// A write of `value` to `addr` by `processor`.
    pub const fn write(processor: usize, addr: usize, value: i64) -> Self {
        Self {
            processor: ProcessorId(processor),
            op: AccessType::Write,
            addr: Addr(addr),
            value,
        }
    }

    /// Builds an instruction from its integer tuple form, validating the op code.
    pub fn from_raw(processor: usize, op: i64, addr: usize, value: i64) -> Result<Self, WorkloadError> {
        Ok(Self {
            processor: ProcessorId(processor),
            op: AccessType::try_from(op)?,
            addr: Addr(addr),
            value,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            AccessType::Read => write!(f, "processor {} reads address {}", self.processor, self.addr),
            AccessType::Write => write!(
                f,
                "processor {} writes value {} at address {}",
                self.processor, self.value, self.addr
            ),
        }
    }
}
