//! Results file output and parsing.
//!
//! A results file is a flat list of `key value` lines, three per protocol:
//!
//! ```text
//! Taxa_Cache_Miss_MESI 12.50
//! Cache_Misses_MESI 5
//! Total_Instrucoes_MESI 40
//! ```
//!
//! These are the keys the plotting scripts read. The reader also accepts the
//! English spellings `Cache_Miss_Rate_<P>` and `Total_Instructions_<P>`.
//!
//! Writing is available in two flavours: [`write_results`] returns the I/O
//! error, [`persist_results`] logs it and carries on.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::common::SimError;
use crate::protocol::ProtocolKind;
use crate::sim::simulator::RunSummary;

const MISS_RATE_KEY: &str = "Taxa_Cache_Miss_";
const MISSES_KEY: &str = "Cache_Misses_";
const TOTAL_KEY: &str = "Total_Instrucoes_";

/// Which metric a results key names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    MissRate,
    Misses,
    Total,
}

/// Recognized key prefixes, written spelling first.
const KEYS: &[(&str, Field)] = &[
    (MISS_RATE_KEY, Field::MissRate),
    ("Cache_Miss_Rate_", Field::MissRate),
    (MISSES_KEY, Field::Misses),
    (TOTAL_KEY, Field::Total),
    ("Total_Instructions_", Field::Total),
];

/// The three persisted metrics of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResultRecord {
    /// Protocol the metrics belong to.
    pub protocol: ProtocolKind,
    /// Miss rate in percent.
    pub miss_rate: f64,
    /// Miss count.
    pub cache_misses: u64,
    /// Instruction count.
    pub total_instructions: u64,
}

impl From<&RunSummary> for ResultRecord {
    fn from(summary: &RunSummary) -> Self {
        Self {
            protocol: summary.protocol,
            miss_rate: summary.metrics.miss_rate(),
            cache_misses: summary.metrics.cache_misses,
            total_instructions: summary.metrics.total_instructions,
        }
    }
}

/// Renders records as results-file text.
pub fn render_results(records: &[ResultRecord]) -> String {
    let mut out = String::new();
    for r in records {
        let p = r.protocol.name();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{MISS_RATE_KEY}{p} {:.2}", r.miss_rate);
        let _ = writeln!(out, "{MISSES_KEY}{p} {}", r.cache_misses);
        let _ = writeln!(out, "{TOTAL_KEY}{p} {}", r.total_instructions);
    }
    out
}

/// Writes `records` to `path`, replacing any existing file.
pub fn write_results(path: impl AsRef<Path>, records: &[ResultRecord]) -> Result<(), SimError> {
    let path = path.as_ref();
    fs::write(path, render_results(records)).map_err(|e| SimError::io(path, e))
}

/// Writes `records` to `path`, logging a failure instead of returning it.
///
/// Returns `true` if the file was written.
pub fn persist_results(path: impl AsRef<Path>, records: &[ResultRecord]) -> bool {
    let path = path.as_ref();
    match write_results(path, records) {
        Ok(()) => {
            tracing::info!(path = %path.display(), records = records.len(), "results written");
            true
        }
        Err(e) => {
            tracing::error!("failed to write results: {e}");
            false
        }
    }
}

/// Parses results-file text.
///
/// Records appear in the order their protocol is first mentioned. Lines with
/// unknown keys, unknown protocols or unparseable values are skipped.
pub fn parse_results(text: &str) -> Vec<ResultRecord> {
    let mut records: Vec<ResultRecord> = Vec::new();
    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once(char::is_whitespace) else {
            continue;
        };
        let value = value.trim();
        let Some((field, protocol)) = split_key(key) else {
            tracing::debug!(key, "skipping unknown results key");
            continue;
        };

        let index = match records.iter().position(|r| r.protocol == protocol) {
            Some(index) => index,
            None => {
                records.push(ResultRecord {
                    protocol,
                    ..ResultRecord::default()
                });
                records.len() - 1
            }
        };
        let record = &mut records[index];
        match field {
            Field::MissRate => {
                if let Ok(v) = value.parse() {
                    record.miss_rate = v;
                }
            }
            Field::Misses => {
                if let Ok(v) = value.parse() {
                    record.cache_misses = v;
                }
            }
            Field::Total => {
                if let Ok(v) = value.parse() {
                    record.total_instructions = v;
                }
            }
        }
    }
    records
}

fn split_key(key: &str) -> Option<(Field, ProtocolKind)> {
    KEYS.iter().find_map(|&(prefix, field)| {
        let suffix = key.strip_prefix(prefix)?;
        let protocol = ProtocolKind::ALL.into_iter().find(|k| k.name() == suffix)?;
        Some((field, protocol))
    })
}

/// Reads and parses a results file.
pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<ResultRecord>, SimError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
    Ok(parse_results(&text))
}
