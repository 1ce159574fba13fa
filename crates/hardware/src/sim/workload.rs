//! Instruction workloads.
//!
//! A workload is an ordered list of [`Instruction`]s replayed by the bus. It can be:
//! 1. **Generated:** Seeded random instructions with a tunable address locality.
//! 2. **Loaded:** Parsed from a text file, one `processor op address value` tuple per line.
//! 3. **Reordered:** Grouped by address, which raises the hit rate without changing semantics.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::{AccessType, Addr, Instruction, ProcessorId, SimError, WorkloadError};
use crate::config::WorkloadConfig;

/// An ordered instruction list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workload(Vec<Instruction>);

impl Workload {
    /// Wraps `instructions` in the given order.
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the instructions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.0.iter()
    }

    /// The instructions as a slice.
    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    /// Checks every instruction against a system of `processors` processors
    /// and `words` memory words, reporting the first offender.
    pub fn validate(&self, processors: usize, words: usize) -> Result<(), WorkloadError> {
        for (index, inst) in self.0.iter().enumerate() {
            if !inst.processor.in_bounds(processors) {
                return Err(WorkloadError::ProcessorOutOfRange {
                    index,
                    processor: inst.processor,
                    processors,
                });
            }
            if !inst.addr.in_bounds(words) {
                return Err(WorkloadError::AddressOutOfRange {
                    index,
                    addr: inst.addr,
                    words,
                });
            }
        }
        Ok(())
    }

    /// Groups instructions sharing an address next to each other.
    ///
    /// Groups are ordered by each address's first occurrence; instructions
    /// keep their relative order inside a group.
    #[must_use]
    pub fn reorder(&self) -> Self {
        let mut order: Vec<Addr> = Vec::new();
        let mut groups: HashMap<Addr, Vec<Instruction>> = HashMap::new();
        for inst in &self.0 {
            groups
                .entry(inst.addr)
                .or_insert_with(|| {
                    order.push(inst.addr);
                    Vec::new()
                })
                .push(*inst);
        }
        Self(
            order
                .iter()
                .filter_map(|addr| groups.remove(addr))
                .flatten()
                .collect(),
        )
    }

    /// Parses the text workload format.
    ///
    /// Each non-blank line holds four whitespace-separated integers:
    /// `processor op address value`. Text after `#` is a comment.
    pub fn parse(text: &str) -> Result<Self, WorkloadError> {
        let mut instructions = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let fields: Vec<&str> = content.split_whitespace().collect();
            let [processor, op, addr, value] = fields.as_slice() else {
                return Err(WorkloadError::Parse {
                    line,
                    reason: format!("expected 4 fields, found {}", fields.len()),
                });
            };
            let processor = parse_field::<usize>(line, "processor", processor)?;
            let op = parse_field::<i64>(line, "op", op)?;
            let addr = parse_field::<usize>(line, "address", addr)?;
            let value = parse_field::<i64>(line, "value", value)?;
            let inst = Instruction::from_raw(processor, op, addr, value).map_err(|e| {
                WorkloadError::Parse {
                    line,
                    reason: e.to_string(),
                }
            })?;
            instructions.push(inst);
        }
        Ok(Self(instructions))
    }

    /// Reads and parses a workload file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        Ok(Self::parse(&text)?)
    }
}

fn parse_field<T: std::str::FromStr>(line: usize, name: &str, raw: &str) -> Result<T, WorkloadError> {
    raw.parse().map_err(|_| WorkloadError::Parse {
        line,
        reason: format!("{name} `{raw}` is not a valid integer"),
    })
}

impl From<Vec<Instruction>> for Workload {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }
}

impl FromIterator<Instruction> for Workload {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Workload {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Seeded random workload generator.
///
/// One "current" address is drawn when the generator is created. Each
/// instruction reuses it with probability `locality_percent`, otherwise it
/// picks a uniform address. Processor, op and value are uniform.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    rng: ChaCha8Rng,
    processors: usize,
    words: usize,
    locality_percent: u8,
    max_value: i64,
    current: usize,
}

/// ChaCha stream used by the generator; stream 0 seeds memory contents.
const GENERATOR_STREAM: u64 = 1;

impl WorkloadGenerator {
    /// Creates a generator for a system of `processors` processors and `words` memory words.
    pub fn new(config: &WorkloadConfig, processors: usize, words: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(GENERATOR_STREAM);
        let words = words.max(1);
        let current = rng.gen_range(0..words);
        Self {
            rng,
            processors: processors.max(1),
            words,
            locality_percent: config.locality_percent.min(100),
            max_value: config.max_value.max(0),
            current,
        }
    }

    /// The address favoured by locality.
    pub const fn current_address(&self) -> Addr {
        Addr(self.current)
    }

    /// Draws the next instruction.
    pub fn next_instruction(&mut self) -> Instruction {
        let processor = self.rng.gen_range(0..self.processors);
        let is_write = self.rng.gen_bool(0.5);
        let addr = if self.rng.gen_range(0..100u8) < self.locality_percent {
            self.current
        } else {
            self.rng.gen_range(0..self.words)
        };
        let value = self.rng.gen_range(0..=self.max_value);
        Instruction {
            processor: ProcessorId(processor),
            op: if is_write {
                AccessType::Write
            } else {
                AccessType::Read
            },
            addr: Addr(addr),
            value,
        }
    }

    /// Draws `n` instructions.
    pub fn generate(&mut self, n: usize) -> Workload {
        (0..n).map(|_| self.next_instruction()).collect()
    }
}

impl Iterator for WorkloadGenerator {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        Some(self.next_instruction())
    }
}
