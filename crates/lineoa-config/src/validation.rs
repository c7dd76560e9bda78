// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::LineOaConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates a deserialized configuration, collecting every problem
/// instead of stopping at the first.
pub fn validate_config(config: &LineOaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.console.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "console.log_level `{}` is not one of {}",
            config.console.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let origin = config.console.webhook_origin.trim();
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        fail(format!(
            "console.webhook_origin `{origin}` must start with http:// or https://"
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.gemini.model.trim().is_empty() {
        fail("gemini.model must not be empty".to_string());
    }

    let base = config.gemini.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        fail(format!(
            "gemini.base_url `{base}` must start with http:// or https://"
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }

    if let Some(key) = &config.gemini.api_key
        && key.trim().is_empty()
    {
        fail("gemini.api_key is set but empty; remove it to use GEMINI_API_KEY".to_string());
    }

    let host = config.gateway.host.trim();
    let is_ip = host.parse::<std::net::IpAddr>().is_ok();
    let is_hostname = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
    if !is_ip && !is_hostname {
        fail(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
