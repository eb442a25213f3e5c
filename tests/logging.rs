//! Logging subscriber installation. Kept in its own test binary because the
//! subscriber is process-global.

#![allow(clippy::expect_used)]

use dns_accept::config::LoggingConfig;
use dns_accept::utils::logging::init_logging;
use dns_accept::{AcceptGate, Header, Opcode};

#[test]
fn test_file_logging_records_rejections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gate.log");

    let config = LoggingConfig {
        log_level: tracing::Level::DEBUG,
        log_to_file: true,
        log_file_path: Some(path.display().to_string()),
        json_format: true,
        ..LoggingConfig::default()
    };
    assert!(config.validate().is_empty());
    init_logging(&config).expect("first install succeeds");

    let gate = AcceptGate::new();
    gate.check(&Header::query(77).with_opcode(Opcode::Update));

    let written = std::fs::read_to_string(&path).expect("log file exists");
    assert!(written.contains("Message rejected"));
    assert!(written.contains("UPDATE"));

    // A second global subscriber cannot be installed
    assert!(init_logging(&config).is_err());
}
