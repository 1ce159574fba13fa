//! Configuration system for the coherence simulator.
//!
//! This module defines all configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline system size and workload shape.
//! 2. **Structures:** Hierarchical config for general, system, workload, and report settings.
//! 3. **Loading:** JSON parsing from a string or file, plus validation of the system size.
//!
//! Configuration is supplied via JSON (`--config`) and/or CLI flags, or use `Config::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::ConfigError;
use crate::protocol::ProtocolKind;
use crate::protocol::peer::PeerUpdate;

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of processors, each with one cache line.
    pub const NUM_PROCESSORS: usize = 4;

    /// Shared memory size in words.
    pub const MEMORY_SIZE: usize = 4;

    /// Instructions generated when no workload file is given.
    pub const INSTRUCTIONS: usize = 1000;

    /// Probability (percent) that a generated instruction reuses the current address.
    pub const LOCALITY_PERCENT: u8 = 80;

    /// Upper bound (inclusive) of generated write values.
    pub const MAX_VALUE: i64 = 1000;
}

/// Simulator configuration.
///
/// Every section and field is optional in JSON; missing ones take their defaults.
///
/// # Examples
///
/// ```
/// use cohsim_core::config::Config;
/// use cohsim_core::protocol::ProtocolKind;
///
/// let json = r#"{
///     "general": { "seed": 7 },
///     "system": { "protocol": "MOESI", "num_processors": 2 },
///     "workload": { "instructions": 50 }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.system.protocol, ProtocolKind::Moesi);
/// assert_eq!(config.system.num_processors, 2);
/// assert_eq!(config.system.memory_size, 4);
/// assert_eq!(config.workload.instructions, 50);
/// assert_eq!(config.general.seed, Some(7));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Protocol and system size
    pub system: SystemConfig,
    /// Generated workload shape
    pub workload: WorkloadConfig,
    /// Results file output
    pub report: ReportConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Rejects configurations the simulator cannot run.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.system.num_processors == 0 {
            return Err(ConfigError::NoProcessors);
        }
        if self.system.memory_size == 0 {
            return Err(ConfigError::NoMemory);
        }
        if self.workload.locality_percent > 100 {
            return Err(ConfigError::LocalityOutOfRange(
                self.workload.locality_percent,
            ));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit the per-instruction trace (enables `debug` logging in the CLI)
    #[serde(default)]
    pub trace_instructions: bool,

    /// Seed for the workload generator and random memory contents. Drawn at random when unset.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Record the miss rate after every instruction.
    #[serde(default)]
    pub track_history: bool,
}

/// Protocol selection and system size.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// `"MESI"` or `"MOESI"`; anything else falls back to MESI
    #[serde(default)]
    pub protocol: ProtocolKind,

    /// Number of processors
    #[serde(default = "SystemConfig::default_processors")]
    pub num_processors: usize,

    /// Shared memory size in words
    #[serde(default = "SystemConfig::default_memory_size")]
    pub memory_size: usize,

    /// Peer update on writes (`"None"` or `"Invalidate"`)
    #[serde(default)]
    pub peer_update: PeerUpdate,
}

impl SystemConfig {
    fn default_processors() -> usize {
        defaults::NUM_PROCESSORS
    }

    fn default_memory_size() -> usize {
        defaults::MEMORY_SIZE
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolKind::default(),
            num_processors: defaults::NUM_PROCESSORS,
            memory_size: defaults::MEMORY_SIZE,
            peer_update: PeerUpdate::default(),
        }
    }
}

/// Shape of the generated workload.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    /// Number of instructions to generate
    #[serde(default = "WorkloadConfig::default_instructions")]
    pub instructions: usize,

    /// Chance (percent) of reusing the current address
    #[serde(default = "WorkloadConfig::default_locality")]
    pub locality_percent: u8,

    /// Largest generated write value
    #[serde(default = "WorkloadConfig::default_max_value")]
    pub max_value: i64,

    /// Group instructions by address before running
    #[serde(default)]
    pub reorder: bool,
}

impl WorkloadConfig {
    fn default_instructions() -> usize {
        defaults::INSTRUCTIONS
    }

    fn default_locality() -> u8 {
        defaults::LOCALITY_PERCENT
    }

    fn default_max_value() -> i64 {
        defaults::MAX_VALUE
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            instructions: defaults::INSTRUCTIONS,
            locality_percent: defaults::LOCALITY_PERCENT,
            max_value: defaults::MAX_VALUE,
            reorder: false,
        }
    }
}

/// Results file output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Where to write `key value` result lines. Nothing is written when unset.
    #[serde(default)]
    pub results_path: Option<PathBuf>,
}
