// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder adapter trait for the generative-AI fallback.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;

/// A stateless text generator used when no keyword rule matches.
///
/// `generate` is infallible by contract: implementations convert every
/// failure (missing credential, transport error, remote error) into a fixed
/// displayable string. Callers cannot tell a declined answer from an error.
#[async_trait]
pub trait ResponderAdapter: PluginAdapter {
    /// Generates a reply to `prompt` using `persona` as the system instruction.
    async fn generate(&self, prompt: &str, persona: &str) -> String;

    /// Whether a credential is present. An unconfigured responder still
    /// answers, with a message asking the operator to configure it.
    fn is_configured(&self) -> bool;
}
