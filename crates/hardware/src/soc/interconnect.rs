//! Coherence bus connecting processors to shared memory.
//!
//! The bus is the only mutator of the system. It provides:
//! 1. **Roster:** Owns every processor, indexed by processor id.
//! 2. **Dispatch:** Bounds-checks an instruction, resolves miss/hit, then performs the read or write.
//! 3. **Owner scan:** `find_owner` locates another processor holding an address `Owned` (MOESI fill).
//! 4. **Peer update:** Runs the configured [`PeerPolicy`] after every write.
//! 5. **Snapshot:** A read-only copy of memory and lines, rendered as a status dump.

use std::fmt;

use crate::common::{AccessType, Addr, Instruction, ProcessorId, WorkloadError};
use crate::core::{CacheLine, Processor};
use crate::protocol::peer::{NoBroadcast, PeerPolicy};
use crate::protocol::transitions::{fill_state, write_state};
use crate::protocol::{LineState, Protocol, ProtocolKind};
use crate::soc::memory::{SharedMemory, WordStatus};
use crate::stats::Metrics;

/// Whether an access found its address resident in a valid line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Line held the address in a valid state.
    Hit,
    /// Line was refilled from shared memory.
    Miss,
}

/// Result of dispatching one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Miss or hit on the issuing processor's line.
    pub outcome: Outcome,
    /// Value read (reads) or stored (writes).
    pub value: i64,
    /// Final state of the issuing processor's line.
    pub state: LineState,
    /// Counters after this instruction.
    pub metrics: Metrics,
}

/// The coherence bus: shared memory, processor roster and run counters.
pub struct Bus {
    memory: SharedMemory,
    protocol: Protocol,
    processors: Vec<Processor>,
    peer_policy: Box<dyn PeerPolicy>,
    in_flight: Option<Instruction>,
    metrics: Metrics,
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("protocol", &self.protocol.kind())
            .field("processors", &self.processors.len())
            .field("memory_words", &self.memory.len())
            .field("peer_policy", &self.peer_policy.name())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Bus {
    /// Creates a bus with `processors` empty caches in front of `memory`.
    ///
    /// Peers are never updated on writes; see [`Bus::with_peer_policy`].
    pub fn new(kind: ProtocolKind, processors: usize, memory: SharedMemory) -> Self {
        Self {
            memory,
            protocol: Protocol::new(kind),
            processors: (0..processors)
                .map(|id| Processor::new(ProcessorId(id)))
                .collect(),
            peer_policy: Box::new(NoBroadcast),
            in_flight: None,
            metrics: Metrics::default(),
        }
    }

    /// Replaces the peer-update policy run after each write.
    #[must_use]
    pub fn with_peer_policy(mut self, policy: Box<dyn PeerPolicy>) -> Self {
        self.peer_policy = policy;
        self
    }

    /// Checks `inst` against the roster and memory size.
    ///
    /// `index` is the instruction's position, reported in the error.
    pub fn check(&self, index: usize, inst: &Instruction) -> Result<(), WorkloadError> {
        if !inst.processor.in_bounds(self.processors.len()) {
            return Err(WorkloadError::ProcessorOutOfRange {
                index,
                processor: inst.processor,
                processors: self.processors.len(),
            });
        }
        if !inst.addr.in_bounds(self.memory.len()) {
            return Err(WorkloadError::AddressOutOfRange {
                index,
                addr: inst.addr,
                words: self.memory.len(),
            });
        }
        Ok(())
    }

    /// Executes one instruction.
    ///
    /// The instruction is bounds-checked first; a rejected instruction leaves
    /// the bus exactly as it was. Otherwise the counters are bumped, the line
    /// is refilled on a miss, and the read or write is applied. Writes go
    /// through to memory and then run the peer policy.
    pub fn dispatch(&mut self, inst: Instruction) -> Result<Dispatch, WorkloadError> {
        let index = usize::try_from(self.metrics.total_instructions).unwrap_or(usize::MAX);
        self.check(index, &inst)?;
        // In range: `check` passed.
        let mem_value = self.memory.read(inst.addr).unwrap_or_default();

        let pid = inst.processor;
        let addr = inst.addr;
        let kind = self.protocol.kind();

        self.in_flight = Some(inst);
        self.metrics.total_instructions += 1;
        match inst.op {
            AccessType::Read => self.metrics.load_instructions += 1,
            AccessType::Write => self.metrics.store_instructions += 1,
        }

        let missed = self.line(pid).is_some_and(|line| line.is_miss(addr));
        let outcome = if missed {
            self.metrics.cache_misses += 1;
            let owned_elsewhere = self.find_owner(addr, pid).is_some();
            if let Some(line) = self.line_mut(pid) {
                line.fill(addr, mem_value, fill_state(kind, owned_elsewhere));
            }
            tracing::debug!("cache miss on processor {pid} for address {addr}");
            Outcome::Miss
        } else {
            tracing::debug!("cache hit on processor {pid} for address {addr}");
            Outcome::Hit
        };

        let value = match inst.op {
            AccessType::Read => {
                let value = self.line(pid).map_or(mem_value, CacheLine::value);
                tracing::debug!("processor {pid} reads value {value} at address {addr}");
                value
            }
            AccessType::Write => {
                if let Some(line) = self.line_mut(pid) {
                    let next = write_state(kind, line.state());
                    line.store(inst.value, next);
                }
                let _stored = self.memory.write(addr, inst.value);
                self.metrics.invalidations +=
                    self.peer_policy.on_write(pid, addr, &mut self.processors);
                tracing::debug!(
                    "processor {pid} writes value {} at address {addr}",
                    inst.value
                );
                inst.value
            }
        };

        let state = self.line(pid).map_or(LineState::Invalid, CacheLine::state);
        debug_assert!(self.protocol.is_valid(state));

        Ok(Dispatch {
            outcome,
            value,
            state,
            metrics: self.metrics,
        })
    }

    /// Returns the first processor other than `excluding` whose line holds
    /// `addr` in the `Owned` state.
    pub fn find_owner(&self, addr: Addr, excluding: ProcessorId) -> Option<ProcessorId> {
        self.processors
            .iter()
            .find(|p| {
                p.id() != excluding
                    && p.line().holds(addr)
                    && p.line().state() == LineState::Owned
            })
            .map(Processor::id)
    }

    fn line(&self, id: ProcessorId) -> Option<&CacheLine> {
        self.processors.get(id.val()).map(Processor::line)
    }

    fn line_mut(&mut self, id: ProcessorId) -> Option<&mut CacheLine> {
        self.processors.get_mut(id.val()).map(Processor::line_mut)
    }

    /// The protocol descriptor.
    pub const fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Shared memory.
    pub const fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    /// The processor roster, indexed by id.
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Processor `id`, if it exists.
    pub fn processor(&self, id: ProcessorId) -> Option<&Processor> {
        self.processors.get(id.val())
    }

    /// Last instruction dispatched.
    pub const fn in_flight(&self) -> Option<Instruction> {
        self.in_flight
    }

    /// Counters so far.
    pub const fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Name of the active peer-update policy.
    pub fn peer_policy_name(&self) -> &'static str {
        self.peer_policy.name()
    }

    /// Copies the observable state of the bus.
    pub fn snapshot(&self) -> BusSnapshot {
        BusSnapshot {
            protocol: self.protocol.kind(),
            words: self.memory.words().to_vec(),
            statuses: self.memory.statuses().to_vec(),
            in_flight: self.in_flight,
            lines: self
                .processors
                .iter()
                .map(|p| (p.id(), *p.line()))
                .collect(),
        }
    }
}

/// Point-in-time copy of memory, the in-flight instruction and every line.
///
/// Displays as a multi-line status dump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusSnapshot {
    /// Active protocol.
    pub protocol: ProtocolKind,
    /// Memory words in address order.
    pub words: Vec<i64>,
    /// Memory word status in address order.
    pub statuses: Vec<WordStatus>,
    /// Last instruction dispatched, if any.
    pub in_flight: Option<Instruction>,
    /// Each processor's line, in roster order.
    pub lines: Vec<(ProcessorId, CacheLine)>,
}

impl fmt::Display for BusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "protocol: {}", self.protocol)?;
        write!(f, "main memory:")?;
        for (addr, (word, status)) in self.words.iter().zip(&self.statuses).enumerate() {
            write!(f, " [{addr}]={word}({status})")?;
        }
        writeln!(f)?;
        match &self.in_flight {
            Some(inst) => writeln!(f, "instruction: {inst}")?,
            None => writeln!(f, "instruction: none")?,
        }
        for (id, line) in &self.lines {
            match line.tag() {
                Some(addr) => writeln!(
                    f,
                    "processor {id}: state {} address {addr} value {}",
                    line.state(),
                    line.value()
                )?,
                None => writeln!(f, "processor {id}: state {} address empty", line.state())?,
            }
        }
        Ok(())
    }
}
