// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the LineOA configuration system.

use lineoa_config::diagnostic::ConfigError;
use lineoa_config::model::PipelineMode;
use lineoa_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[console]
name = "shop"
log_level = "debug"
webhook_origin = "https://shop.example.com"

[storage]
database_path = "/tmp/lineoa-test.db"
wal_mode = false

[gemini]
api_key = "g-123"
model = "gemini-2.0-flash"
base_url = "http://127.0.0.1:9000"
timeout_secs = 5

[pipeline]
rule_reply_delay_ms = 0
ai_reply_delay_ms = 10
mode = "concurrent"

[gateway]
host = "0.0.0.0"
port = 8080
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.console.name, "shop");
    assert_eq!(config.console.webhook_origin, "https://shop.example.com");
    assert_eq!(config.storage.database_path, "/tmp/lineoa-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gemini.api_key.as_deref(), Some("g-123"));
    assert_eq!(config.gemini.timeout_secs, 5);
    assert_eq!(config.pipeline.rule_reply_delay_ms, 0);
    assert_eq!(config.pipeline.mode, PipelineMode::Concurrent);
    assert_eq!(config.gateway.port, 8080);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.console.name, "lineoa");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 3000);
    assert!(config.gemini.api_key.is_none());
}

#[test]
fn typo_in_section_yields_unknown_key_with_suggestion() {
    let errors = load_and_validate_str("[gemini]\nmodle = \"x\"\n").expect_err("typo rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "modle");
            assert_eq!(suggestion.as_deref(), Some("model"));
            assert!(valid_keys.contains("base_url"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let errors = load_and_validate_str("[telegram]\nbot_token = \"x\"\n").expect_err("rejected");
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_yields_invalid_type() {
    let errors = load_and_validate_str("[gateway]\nport = \"eighty\"\n").expect_err("rejected");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key == "gateway.port"),
        "got {:?}",
        errors[0]
    );
}

#[test]
fn semantic_errors_surface_as_validation() {
    let errors =
        load_and_validate_str("[console]\nlog_level = \"chatty\"\n").expect_err("rejected");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn config_file_on_disk_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lineoa.toml");
    std::fs::write(&path, "[pipeline]\nai_reply_delay_ms = 42\n").unwrap();

    let config = load_and_validate_path(&path).expect("valid file");
    assert_eq!(config.pipeline.ai_reply_delay_ms, 42);
}

#[test]
fn missing_file_is_silently_skipped() {
    let config = load_and_validate_path(std::path::Path::new("/nonexistent/lineoa.toml"))
        .expect("missing file falls back to defaults");
    assert_eq!(config.pipeline.rule_reply_delay_ms, 500);
}
