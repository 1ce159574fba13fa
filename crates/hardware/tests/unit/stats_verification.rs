//! Metrics unit tests.
//!
//! Verifies default initialization, derived rates with the zero guard, and
//! the sectioned report text.

use cohsim_core::stats::{Metrics, STATS_SECTIONS, percent};

#[test]
fn default_metrics_all_zero() {
    let m = Metrics::default();
    assert_eq!(m.total_instructions, 0);
    assert_eq!(m.load_instructions, 0);
    assert_eq!(m.store_instructions, 0);
    assert_eq!(m.cache_misses, 0);
    assert_eq!(m.invalidations, 0);
    assert_eq!(m.total_cycles, 0);
    assert_eq!(m.compute_cycles, 0);
    assert_eq!(m.idle_cycles, 0);
}

#[test]
fn empty_run_rates_are_zero() {
    let m = Metrics::default();
    assert_eq!(m.miss_rate(), 0.0);
    assert_eq!(m.hit_rate(), 0.0);
    assert_eq!(m.cache_hits(), 0);
    assert_eq!(format!("{:.2}", m.miss_rate()), "0.00");
}

#[test]
fn rates_are_percentages() {
    let m = Metrics {
        total_instructions: 40,
        load_instructions: 25,
        store_instructions: 15,
        cache_misses: 5,
        ..Metrics::default()
    };
    assert_eq!(m.cache_hits(), 35);
    assert!((m.miss_rate() - 12.5).abs() < 1e-9);
    assert!((m.hit_rate() - 87.5).abs() < 1e-9);
}

#[test]
fn percent_guards_zero_denominator() {
    assert_eq!(percent(3, 0), 0.0);
    assert!((percent(1, 3) - 33.333_333).abs() < 1e-4);
}

#[test]
fn report_renders_all_sections() {
    let m = Metrics {
        total_instructions: 8,
        load_instructions: 6,
        store_instructions: 2,
        cache_misses: 1,
        ..Metrics::default()
    };
    let text = m.report("MESI", &[]).to_string();
    assert!(text.contains("CACHE COHERENCE SIMULATION STATISTICS (MESI)"));
    assert!(text.contains("op.load                  6 (75.00%)"));
    assert!(text.contains("cache.miss_rate        12.50%"));
    assert!(text.contains("cache.hit_rate         87.50%"));
    assert!(text.contains("CYCLES"));
}

#[test]
fn report_filters_sections() {
    let m = Metrics::default();
    let sections = vec!["memory".to_string()];
    let text = m.report("MOESI", &sections).to_string();
    assert!(text.contains("MEMORY"));
    assert!(text.contains("cache.miss_rate        0.00%"));
    assert!(!text.contains("sim_insts"));
    assert!(!text.contains("CYCLES"));
}

#[test]
fn section_names() {
    assert_eq!(STATS_SECTIONS, &["summary", "memory", "cycles"]);
}
