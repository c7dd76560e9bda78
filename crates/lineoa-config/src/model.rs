// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the LineOA console.
//!
//! Every section rejects unrecognized keys so that a typo surfaces at
//! startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LineOaConfig {
    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Console identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Account name shown by the CLI and the health endpoint.
    #[serde(default = "default_console_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Public origin used to derive the advisory webhook URL.
    #[serde(default = "default_webhook_origin")]
    pub webhook_origin: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            name: default_console_name(),
            log_level: default_log_level(),
            webhook_origin: default_webhook_origin(),
        }
    }
}

fn default_console_name() -> String {
    "lineoa".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_webhook_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Record store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database file. Defaults to the XDG data directory.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("lineoa").join("lineoa.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("lineoa.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Gemini text-generation endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. When unset, `GEMINI_API_KEY` and then `API_KEY` are consulted.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// How pipeline invocations relate to one another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// One invocation at a time; turns never interleave.
    #[default]
    Serialized,
    /// Invocations overlap at their suspension points.
    Concurrent,
}

/// Message resolution pipeline tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Pause before a keyword rule reply is written.
    #[serde(default = "default_rule_reply_delay_ms")]
    pub rule_reply_delay_ms: u64,

    /// Pause before an AI reply is written.
    #[serde(default = "default_ai_reply_delay_ms")]
    pub ai_reply_delay_ms: u64,

    #[serde(default)]
    pub mode: PipelineMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rule_reply_delay_ms: default_rule_reply_delay_ms(),
            ai_reply_delay_ms: default_ai_reply_delay_ms(),
            mode: PipelineMode::default(),
        }
    }
}

fn default_rule_reply_delay_ms() -> u64 {
    500
}

fn default_ai_reply_delay_ms() -> u64 {
    1500
}

/// HTTP console API listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_console_behaviour() {
        let config = LineOaConfig::default();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.pipeline.rule_reply_delay_ms, 500);
        assert_eq!(config.pipeline.ai_reply_delay_ms, 1500);
        assert_eq!(config.pipeline.mode, PipelineMode::Serialized);
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("lineoa.db"));
    }

    #[test]
    fn pipeline_mode_parses_lowercase() {
        let parsed: PipelineConfig = toml::from_str("mode = \"concurrent\"").unwrap();
        assert_eq!(parsed.mode, PipelineMode::Concurrent);
        assert_eq!(parsed.ai_reply_delay_ms, 1500);
    }

    #[test]
    fn unknown_gateway_key_is_rejected() {
        let result: Result<GatewayConfig, _> = toml::from_str("prot = 80");
        assert!(result.is_err());
    }
}
