//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization, the protocol
//! literal fallback, and validation.

use std::io::Write;

use cohsim_core::common::ConfigError;
use cohsim_core::config::*;
use cohsim_core::protocol::ProtocolKind;
use cohsim_core::protocol::peer::PeerUpdate;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace_instructions);
    assert_eq!(config.general.seed, None);
    assert!(!config.general.track_history);
    assert_eq!(config.system.protocol, ProtocolKind::Mesi);
    assert_eq!(config.system.num_processors, 4);
    assert_eq!(config.system.memory_size, 4);
    assert_eq!(config.system.peer_update, PeerUpdate::None);
    assert_eq!(config.workload.instructions, 1000);
    assert_eq!(config.workload.locality_percent, 80);
    assert_eq!(config.workload.max_value, 1000);
    assert!(!config.workload.reorder);
    assert_eq!(config.report.results_path, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_matches_default() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.system.num_processors, 4);
    assert_eq!(config.system.memory_size, 4);
    assert_eq!(config.workload.instructions, 1000);
    assert_eq!(config.workload.locality_percent, 80);
}

#[test]
fn test_partial_sections_fill_defaults() {
    let json = r#"{
        "system": { "protocol": "MOESI", "peer_update": "Invalidate" },
        "workload": { "reorder": true },
        "report": { "results_path": "out.txt" }
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.system.protocol, ProtocolKind::Moesi);
    assert_eq!(config.system.peer_update, PeerUpdate::Invalidate);
    assert_eq!(config.system.num_processors, 4);
    assert!(config.workload.reorder);
    assert_eq!(config.workload.max_value, 1000);
    assert_eq!(
        config.report.results_path.as_deref(),
        Some(std::path::Path::new("out.txt"))
    );
}

#[test]
fn test_unknown_protocol_falls_back_to_mesi() {
    for literal in ["MSI", "moesi", "Moesi", ""] {
        let json = format!(r#"{{ "system": {{ "protocol": "{literal}" }} }}"#);
        let config = Config::from_json_str(&json).unwrap();
        assert_eq!(config.system.protocol, ProtocolKind::Mesi, "literal {literal:?}");
    }
}

#[test]
fn test_validate_rejects_zero_processors() {
    let err = Config::from_json_str(r#"{ "system": { "num_processors": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NoProcessors));
}

#[test]
fn test_validate_rejects_zero_memory() {
    let mut config = Config::default();
    config.system.memory_size = 0;
    assert!(matches!(config.validate(), Err(ConfigError::NoMemory)));
}

#[test]
fn test_validate_rejects_locality_above_100() {
    let mut config = Config::default();
    config.workload.locality_percent = 101;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::LocalityOutOfRange(101))
    ));
    config.workload.locality_percent = 100;
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = Config::from_json_str(r#"{ "system": { "num_processors": "four" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "seed": 11, "track_history": true }} }}"#).unwrap();

    let config = Config::from_json_file(file.path()).unwrap();
    assert_eq!(config.general.seed, Some(11));
    assert!(config.general.track_history);
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match Config::from_json_file(&path) {
        Err(ConfigError::Read { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected read error, got {other:?}"),
    }
}
