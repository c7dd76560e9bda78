// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lineoa.toml` > `~/.config/lineoa/lineoa.toml` > `/etc/lineoa/lineoa.toml`
//! with environment variable overrides via `LINEOA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LineOaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lineoa/lineoa.toml`
/// 3. `~/.config/lineoa/lineoa.toml`
/// 4. `./lineoa.toml`
/// 5. `LINEOA_*` environment variables
pub fn load_config() -> Result<LineOaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LineOaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LineOaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LineOaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LineOaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LineOaConfig::default()))
        .merge(Toml::file("/etc/lineoa/lineoa.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("lineoa/lineoa.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("lineoa.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that underscore-containing
/// keys survive: `LINEOA_GEMINI_API_KEY` maps to `gemini.api_key`, not
/// `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("LINEOA_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["console", "storage", "gemini", "pipeline", "gateway"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
