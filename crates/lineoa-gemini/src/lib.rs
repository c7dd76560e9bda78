// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini responder for the LineOA console.
//!
//! [`GeminiResponder`] implements [`ResponderAdapter`] over the Gemini
//! `generateContent` REST endpoint. It never returns an error to callers:
//! every failure becomes one of the fixed operator-facing strings below.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use lineoa_config::model::GeminiConfig;
use lineoa_core::{AdapterType, HealthStatus, LineOaError, PluginAdapter, ResponderAdapter};
use tracing::{error, info, warn};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Returned when no API key is available.
pub const UNCONFIGURED_REPLY: &str =
    "กรุณาตั้งค่า GEMINI_API_KEY (หรือ gemini.api_key ใน lineoa.toml) ก่อนใช้งาน AI";

/// Returned when the model answers with no text.
pub const EMPTY_REPLY: &str = "ขออภัย ไม่สามารถประมวลผลคำตอบได้ในขณะนี้";

/// Returned when the call fails for any reason.
pub const FAILURE_REPLY: &str = "เกิดข้อผิดพลาดในการเชื่อมต่อกับ AI";

/// Persona used when the caller passes an empty one.
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant for a LINE Official Account.";

enum ClientState {
    Ready(GeminiClient),
    Unconfigured,
    /// A key was found but no client could be built from it.
    Broken(String),
}

/// Gemini-backed responder.
pub struct GeminiResponder {
    state: ClientState,
}

impl GeminiResponder {
    /// Builds a responder from configuration.
    ///
    /// API key resolution: `gemini.api_key`, then `GEMINI_API_KEY`, then
    /// `API_KEY`. With none set the responder is created unconfigured. A key
    /// that cannot be used (e.g. not a valid header value) leaves the
    /// responder answering with [`FAILURE_REPLY`].
    pub fn new(config: &GeminiConfig) -> Self {
        let state = match resolve_api_key(config.api_key.as_deref()) {
            Some(key) => match GeminiClient::new(
                &key,
                config.model.clone(),
                config.base_url.clone(),
                Duration::from_secs(config.timeout_secs),
            ) {
                Ok(client) => ClientState::Ready(client),
                Err(e) => {
                    error!(error = %e, "Gemini client unavailable; AI replies will report a failure");
                    ClientState::Broken(e.to_string())
                }
            },
            None => {
                warn!("no Gemini API key configured; AI replies will ask for one");
                ClientState::Unconfigured
            }
        };
        info!(
            model = %config.model,
            ready = matches!(state, ClientState::Ready(_)),
            "Gemini responder created"
        );
        Self { state }
    }

    /// Calls the model, surfacing the failure instead of converting it.
    pub async fn try_generate(&self, prompt: &str, persona: &str) -> Result<String, LineOaError> {
        let client = match &self.state {
            ClientState::Ready(client) => client,
            ClientState::Unconfigured => {
                return Err(LineOaError::Provider {
                    message: "Gemini API key not configured".to_string(),
                    source: None,
                });
            }
            ClientState::Broken(reason) => {
                return Err(LineOaError::Provider {
                    message: reason.clone(),
                    source: None,
                });
            }
        };
        let persona = if persona.trim().is_empty() {
            DEFAULT_PERSONA
        } else {
            persona
        };
        let request = GenerateContentRequest::single_turn(prompt, persona);
        Ok(client.generate_content(&request).await?.text())
    }
}

/// First non-blank key from config, `GEMINI_API_KEY`, `API_KEY`.
pub fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    configured
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("GEMINI_API_KEY").ok())
        .chain(std::env::var("API_KEY").ok())
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
}

#[async_trait]
impl PluginAdapter for GeminiResponder {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Responder
    }

    async fn health_check(&self) -> Result<HealthStatus, LineOaError> {
        Ok(match &self.state {
            ClientState::Ready(_) => HealthStatus::Healthy,
            ClientState::Unconfigured => {
                HealthStatus::Degraded("API key not configured".to_string())
            }
            ClientState::Broken(reason) => HealthStatus::Unhealthy(reason.clone()),
        })
    }

    async fn shutdown(&self) -> Result<(), LineOaError> {
        Ok(())
    }
}

#[async_trait]
impl ResponderAdapter for GeminiResponder {
    async fn generate(&self, prompt: &str, persona: &str) -> String {
        let model = match &self.state {
            ClientState::Unconfigured => return UNCONFIGURED_REPLY.to_string(),
            ClientState::Broken(_) => return FAILURE_REPLY.to_string(),
            ClientState::Ready(client) => client.model(),
        };
        match self.try_generate(prompt, persona).await {
            Ok(text) if text.is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, model, "Gemini call failed");
                FAILURE_REPLY.to_string()
            }
        }
    }

    /// True once any API key is found, even one that could not be used.
    fn is_configured(&self) -> bool {
        !matches!(self.state, ClientState::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config(api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.map(str::to_string),
            ..GeminiConfig::default()
        }
    }

    #[test]
    #[serial]
    fn configured_key_wins_over_env() {
        // SAFETY: serialized with every other env-touching test in this crate.
        unsafe { std::env::set_var("GEMINI_API_KEY", "from-env") };
        assert_eq!(resolve_api_key(Some("from-config")).as_deref(), Some("from-config"));
        assert_eq!(resolve_api_key(None).as_deref(), Some("from-env"));
        unsafe { std::env::remove_var("GEMINI_API_KEY") };
    }

    #[test]
    #[serial]
    fn blank_keys_are_skipped() {
        unsafe {
            std::env::remove_var("GEMINI_API_KEY");
            std::env::set_var("API_KEY", "  fallback  ");
        }
        assert_eq!(resolve_api_key(Some("   ")).as_deref(), Some("fallback"));
        unsafe { std::env::remove_var("API_KEY") };
        assert_eq!(resolve_api_key(Some("")), None);
    }

    #[tokio::test]
    #[serial]
    async fn unconfigured_responder_asks_for_key() {
        unsafe {
            std::env::remove_var("GEMINI_API_KEY");
            std::env::remove_var("API_KEY");
        }
        let responder = GeminiResponder::new(&config(None));
        assert!(!responder.is_configured());
        assert_eq!(responder.generate("hi", "").await, UNCONFIGURED_REPLY);
        assert!(matches!(
            responder.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
        assert!(responder.try_generate("hi", "").await.is_err());
    }

    #[test]
    #[serial]
    fn adapter_identity() {
        let responder = GeminiResponder::new(&config(Some("k")));
        assert_eq!(responder.name(), "gemini");
        assert_eq!(responder.adapter_type(), AdapterType::Responder);
        assert!(responder.is_configured());
    }

    #[tokio::test]
    #[serial]
    async fn unusable_key_still_builds_failing_responder() {
        let responder = GeminiResponder::new(&config(Some("a\nb")));
        assert!(responder.is_configured());
        assert_eq!(responder.generate("hi", "").await, FAILURE_REPLY);
        assert!(matches!(
            responder.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        assert!(responder.try_generate("hi", "").await.is_err());
    }
}
