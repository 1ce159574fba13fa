//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters the bus accumulates while replaying a workload. It provides:
//! 1. **Instruction counts:** Total instructions, loads and stores.
//! 2. **Cache behavior:** Misses, derived hits, and peer invalidations.
//! 3. **Cycle counters:** Total/compute/idle cycles. No timing model drives them, so they stay 0.
//! 4. **Reporting:** Hit/miss percentages and a sectioned text report.

use std::fmt;

/// Counters accumulated by the bus over one run.
///
/// Invariants: `load_instructions + store_instructions == total_instructions`
/// and `cache_misses <= total_instructions`. All counters only grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Number of instructions dispatched.
    pub total_instructions: u64,
    /// Number of read instructions dispatched.
    pub load_instructions: u64,
    /// Number of write instructions dispatched.
    pub store_instructions: u64,
    /// Number of dispatches that missed the addressed line.
    pub cache_misses: u64,
    /// Peer lines invalidated by write broadcasts (0 unless broadcasting is enabled).
    pub invalidations: u64,
    /// Total cycles. Not driven by the simulation loop.
    pub total_cycles: u64,
    /// Compute cycles. Not driven by the simulation loop.
    pub compute_cycles: u64,
    /// Idle cycles. Not driven by the simulation loop.
    pub idle_cycles: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"memory"`, `"cycles"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "memory", "cycles"];

/// Returns `part / whole` as a percentage, or `0.0` when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

impl Metrics {
    /// Dispatches that hit the addressed line.
    pub const fn cache_hits(&self) -> u64 {
        self.total_instructions.saturating_sub(self.cache_misses)
    }

    /// Miss rate in percent; `0.0` for an empty run.
    pub fn miss_rate(&self) -> f64 {
        percent(self.cache_misses, self.total_instructions)
    }

    /// Hit rate in percent; `0.0` for an empty run.
    pub fn hit_rate(&self) -> f64 {
        percent(self.cache_hits(), self.total_instructions)
    }

    /// Returns a displayable report limited to `sections` (all when empty).
    pub fn report<'a>(&'a self, title: &'a str, sections: &'a [String]) -> StatsReport<'a> {
        StatsReport {
            metrics: self,
            title,
            sections,
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, title: &str, sections: &[String]) {
        println!("{}", self.report(title, sections));
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self, title: &str) {
        self.print_sections(title, &[]);
    }
}

/// Sectioned text rendering of [`Metrics`], produced by [`Metrics::report`].
#[derive(Debug, Clone, Copy)]
pub struct StatsReport<'a> {
    metrics: &'a Metrics,
    title: &'a str,
    sections: &'a [String],
}

const RULE_HEAVY: &str = "==========================================================";
const RULE_LIGHT: &str = "----------------------------------------------------------";

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let want = |s: &str| self.sections.is_empty() || self.sections.iter().any(|x| x == s);
        let m = self.metrics;

        writeln!(f, "{RULE_HEAVY}")?;
        writeln!(f, "CACHE COHERENCE SIMULATION STATISTICS ({})", self.title)?;
        writeln!(f, "{RULE_HEAVY}")?;
        if want("summary") {
            writeln!(f, "sim_insts                {}", m.total_instructions)?;
            writeln!(
                f,
                "op.load                  {} ({:.2}%)",
                m.load_instructions,
                percent(m.load_instructions, m.total_instructions)
            )?;
            writeln!(
                f,
                "op.store                 {} ({:.2}%)",
                m.store_instructions,
                percent(m.store_instructions, m.total_instructions)
            )?;
            writeln!(f, "{RULE_LIGHT}")?;
        }
        if want("memory") {
            writeln!(f, "MEMORY")?;
            writeln!(f, "  cache.misses           {}", m.cache_misses)?;
            writeln!(f, "  cache.hits             {}", m.cache_hits())?;
            writeln!(f, "  cache.hit_rate         {:.2}%", m.hit_rate())?;
            writeln!(f, "  cache.miss_rate        {:.2}%", m.miss_rate())?;
            writeln!(f, "  peer.invalidations     {}", m.invalidations)?;
            writeln!(f, "{RULE_LIGHT}")?;
        }
        if want("cycles") {
            writeln!(f, "CYCLES")?;
            writeln!(f, "  cycles.total           {}", m.total_cycles)?;
            writeln!(f, "  cycles.compute         {}", m.compute_cycles)?;
            writeln!(f, "  cycles.idle            {}", m.idle_cycles)?;
        }
        write!(f, "{RULE_HEAVY}")
    }
}
