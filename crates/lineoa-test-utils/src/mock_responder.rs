// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted responder for deterministic tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lineoa_core::{AdapterType, HealthStatus, LineOaError, PluginAdapter, ResponderAdapter};

/// Text returned once the scripted queue is exhausted.
pub const DEFAULT_MOCK_REPLY: &str = "mock response";

/// A responder that pops replies from a FIFO queue.
///
/// Every call is recorded as `(prompt, persona)`. An optional latency is
/// slept before answering, and the responder can be told to panic to
/// exercise failure handling.
pub struct MockResponder {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, String)>>,
    latency: Option<Duration>,
    configured: bool,
    panics: bool,
}

impl MockResponder {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            latency: None,
            configured: true,
            panics: false,
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }

    /// Sleeps `latency` before every answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reports itself as unconfigured.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Panics on every call.
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub async fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Every `(prompt, persona)` received, in call order.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockResponder {
    fn name(&self) -> &str {
        "mock-responder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Responder
    }

    async fn health_check(&self) -> Result<HealthStatus, LineOaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LineOaError> {
        Ok(())
    }
}

#[async_trait]
impl ResponderAdapter for MockResponder {
    async fn generate(&self, prompt: &str, persona: &str) -> String {
        self.calls
            .lock()
            .await
            .push((prompt.to_string(), persona.to_string()));
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.panics {
            panic!("mock responder told to panic");
        }
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_MOCK_REPLY.to_string())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_fifo_order_then_default() {
        let mock = MockResponder::with_responses(["one", "two"]);
        assert_eq!(mock.generate("a", "p").await, "one");
        assert_eq!(mock.generate("b", "p").await, "two");
        assert_eq!(mock.generate("c", "p").await, DEFAULT_MOCK_REPLY);
        assert_eq!(mock.call_count().await, 3);
        assert_eq!(mock.calls().await[1], ("b".to_string(), "p".to_string()));
    }

    #[tokio::test]
    async fn pushed_responses_are_queued() {
        let mock = MockResponder::new();
        mock.push_response("later").await;
        assert_eq!(mock.generate("x", "").await, "later");
    }

    #[test]
    fn unconfigured_flag() {
        assert!(!MockResponder::new().unconfigured().is_configured());
    }
}
