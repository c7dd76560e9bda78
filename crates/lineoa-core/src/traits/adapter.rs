// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and lifecycle shared by the storage backends and the AI responder.

use async_trait::async_trait;

use crate::error::LineOaError;
use crate::types::{AdapterType, HealthStatus};

/// Common surface of every pluggable backend.
///
/// `/health` reads each backend's status through this trait.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short backend name, e.g. `sqlite` or `gemini`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Probes the backend. Errors mean the probe itself could not run.
    async fn health_check(&self) -> Result<HealthStatus, LineOaError>;

    /// Flushes and releases the backend. Called once at exit.
    async fn shutdown(&self) -> Result<(), LineOaError>;
}
