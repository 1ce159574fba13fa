//! Simulator: owns the bus and replays workloads on it.
//!
//! The simulator is the top-level entry point. It builds the shared memory
//! and the bus from a [`Config`], validates a workload against the configured
//! system before touching any state, then dispatches the instructions in order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::common::{ConfigError, SimError};
use crate::config::Config;
use crate::protocol::ProtocolKind;
use crate::sim::workload::Workload;
use crate::soc::{Bus, SharedMemory};
use crate::stats::Metrics;

/// Outcome of one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Protocol the run used.
    pub protocol: ProtocolKind,
    /// Counters at the end of the run.
    pub metrics: Metrics,
    /// Miss rate (percent) after each instruction. Empty unless history tracking is on.
    pub miss_rate_history: Vec<f64>,
}

/// Top-level simulator: a bus plus run options.
#[derive(Debug)]
pub struct Simulator {
    bus: Bus,
    seed: u64,
    track_history: bool,
}

/// Returns `seed`, or draws and logs a fresh one when it is unset.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no seed configured, using a random one");
        seed
    })
}

impl Simulator {
    /// Creates a simulator whose memory is filled with seeded random words.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = resolve_seed(config.general.seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let memory = SharedMemory::random(config.system.memory_size, &mut rng);
        Ok(Self::build(config, memory, seed))
    }

    /// Creates a simulator over explicit memory contents.
    ///
    /// The memory size comes from `memory`, not from `config.system.memory_size`.
    pub fn with_memory(config: &Config, memory: SharedMemory) -> Result<Self, ConfigError> {
        config.validate()?;
        if memory.is_empty() {
            return Err(ConfigError::NoMemory);
        }
        let seed = config.general.seed.unwrap_or_default();
        Ok(Self::build(config, memory, seed))
    }

    fn build(config: &Config, memory: SharedMemory, seed: u64) -> Self {
        let bus = Bus::new(config.system.protocol, config.system.num_processors, memory)
            .with_peer_policy(config.system.peer_update.build());
        Self {
            bus,
            seed,
            track_history: config.general.track_history,
        }
    }

    /// Replays `workload` on the bus.
    ///
    /// The whole workload is checked first; an out-of-range instruction is
    /// reported and nothing is executed. Counters accumulate across calls.
    pub fn run(&mut self, workload: &Workload) -> Result<RunSummary, SimError> {
        workload.validate(self.bus.processors().len(), self.bus.memory().len())?;

        let protocol = self.bus.protocol().kind();
        tracing::info!(
            %protocol,
            instructions = workload.len(),
            processors = self.bus.processors().len(),
            words = self.bus.memory().len(),
            peer_policy = self.bus.peer_policy_name(),
            "simulation started"
        );

        let mut history = Vec::new();
        for inst in workload {
            let dispatch = self.bus.dispatch(*inst)?;
            if self.track_history {
                history.push(dispatch.metrics.miss_rate());
            }
        }

        let metrics = self.bus.metrics();
        tracing::info!(
            %protocol,
            misses = metrics.cache_misses,
            total = metrics.total_instructions,
            "simulation finished, miss rate {:.2}%",
            metrics.miss_rate()
        );

        Ok(RunSummary {
            protocol,
            metrics,
            miss_rate_history: history,
        })
    }

    /// The bus, for inspection.
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Seed used for the memory contents.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Summaries of the same workload under both protocols.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// MESI run.
    pub mesi: RunSummary,
    /// MOESI run.
    pub moesi: RunSummary,
}

impl Comparison {
    /// Both summaries, MESI first.
    pub fn summaries(&self) -> [&RunSummary; 2] {
        [&self.mesi, &self.moesi]
    }
}

/// Runs `workload` on a fresh MESI simulator and a fresh MOESI simulator.
///
/// Both start from the same memory contents; `config.system.protocol` is ignored.
pub fn compare(config: &Config, workload: &Workload) -> Result<Comparison, SimError> {
    let mut config = config.clone();
    config.general.seed = Some(resolve_seed(config.general.seed));

    let mut run = |protocol: ProtocolKind| -> Result<RunSummary, SimError> {
        config.system.protocol = protocol;
        Simulator::new(&config)?.run(workload)
    };

    Ok(Comparison {
        mesi: run(ProtocolKind::Mesi)?,
        moesi: run(ProtocolKind::Moesi)?,
    })
}
