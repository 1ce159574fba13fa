//! Simulation loop tests: whole-workload validation, history, determinism and comparison.

use cohsim_core::common::{Addr, ConfigError, Instruction, WorkloadError};
use cohsim_core::config::Config;
use cohsim_core::protocol::peer::PeerUpdate;
use cohsim_core::protocol::{LineState, ProtocolKind};
use cohsim_core::sim::{Simulator, Workload, WorkloadGenerator, compare};
use cohsim_core::soc::SharedMemory;
use cohsim_core::{Metrics, SimError};
use pretty_assertions::assert_eq;

use crate::common::harness::init_tracing;

fn seeded(seed: u64) -> Config {
    init_tracing();
    let mut config = Config::default();
    config.general.seed = Some(seed);
    config
}

fn generated(config: &Config, n: usize) -> Workload {
    WorkloadGenerator::new(
        &config.workload,
        config.system.num_processors,
        config.system.memory_size,
        config.general.seed.unwrap_or_default(),
    )
    .generate(n)
}

#[test]
fn test_empty_workload_reports_zero() {
    let mut sim = Simulator::new(&seeded(1)).unwrap();
    let summary = sim.run(&Workload::default()).unwrap();

    assert_eq!(summary.metrics, Metrics::default());
    assert_eq!(format!("{:.2}", summary.metrics.miss_rate()), "0.00");
    assert!(summary.miss_rate_history.is_empty());
}

#[test]
fn test_invalid_workload_runs_nothing() {
    let mut sim = Simulator::new(&seeded(1)).unwrap();
    let before = sim.bus().snapshot();
    let workload = Workload::new(vec![
        Instruction::write(0, 0, 1),
        Instruction::write(0, 1, 2),
        Instruction::read(9, 0),
    ]);

    let err = sim.run(&workload).unwrap_err();
    assert!(matches!(
        err,
        SimError::Workload(WorkloadError::ProcessorOutOfRange { index: 2, .. })
    ));
    assert_eq!(sim.bus().snapshot(), before);
    assert_eq!(sim.bus().metrics(), Metrics::default());
}

#[test]
fn test_history_tracks_every_instruction() {
    let mut config = seeded(5);
    config.general.track_history = true;
    let workload = generated(&config, 50);

    let summary = Simulator::new(&config).unwrap().run(&workload).unwrap();
    assert_eq!(summary.miss_rate_history.len(), 50);
    // The first access always misses.
    assert_eq!(summary.miss_rate_history[0], 100.0);
    let last = *summary.miss_rate_history.last().unwrap();
    assert!((last - summary.metrics.miss_rate()).abs() < 1e-9);
}

#[test]
fn test_same_seed_same_result() {
    let config = seeded(99);
    let workload = generated(&config, 300);

    let mut a = Simulator::new(&config).unwrap();
    let mut b = Simulator::new(&config).unwrap();
    assert_eq!(a.bus().memory(), b.bus().memory());
    assert_eq!(
        a.run(&workload).unwrap().metrics,
        b.run(&workload).unwrap().metrics
    );
    assert_eq!(a.seed(), 99);
}

#[test]
fn test_with_memory_uses_given_words() {
    let config = seeded(0);
    let mut sim = Simulator::with_memory(&config, SharedMemory::from_words(vec![3, 1, 4])).unwrap();
    assert_eq!(sim.bus().memory().len(), 3);

    let _ = sim
        .run(&Workload::new(vec![Instruction::write(2, 2, 8)]))
        .unwrap();
    assert_eq!(sim.bus().memory().read(Addr(2)), Some(8));
}

#[test]
fn test_with_empty_memory_rejected() {
    let err = Simulator::with_memory(&seeded(0), SharedMemory::new(0)).unwrap_err();
    assert!(matches!(err, ConfigError::NoMemory));
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = seeded(0);
    config.system.num_processors = 0;
    assert!(matches!(
        Simulator::new(&config).unwrap_err(),
        ConfigError::NoProcessors
    ));
}

#[test]
fn test_invalidate_policy_from_config() {
    let mut config = seeded(3);
    config.system.peer_update = PeerUpdate::Invalidate;
    let mut sim = Simulator::new(&config).unwrap();
    let _ = sim
        .run(&Workload::new(vec![
            Instruction::read(0, 1),
            Instruction::write(1, 1, 5),
        ]))
        .unwrap();

    assert_eq!(sim.bus().metrics().invalidations, 1);
    let p0 = sim.bus().processors()[0].line().state();
    assert_eq!(p0, LineState::Invalid);
}

#[test]
fn test_compare_runs_both_protocols() {
    let mut config = seeded(21);
    config.system.protocol = ProtocolKind::Moesi;
    let workload = generated(&config, 200);

    let comparison = compare(&config, &workload).unwrap();
    assert_eq!(comparison.mesi.protocol, ProtocolKind::Mesi);
    assert_eq!(comparison.moesi.protocol, ProtocolKind::Moesi);
    for summary in comparison.summaries() {
        assert_eq!(summary.metrics.total_instructions, 200);
    }

    // Miss/hit resolution does not depend on the protocol.
    assert_eq!(
        comparison.mesi.metrics.cache_misses,
        comparison.moesi.metrics.cache_misses
    );

    let mut single = config.clone();
    single.system.protocol = ProtocolKind::Mesi;
    let alone = Simulator::new(&single).unwrap().run(&workload).unwrap();
    assert_eq!(alone.metrics, comparison.mesi.metrics);
}
