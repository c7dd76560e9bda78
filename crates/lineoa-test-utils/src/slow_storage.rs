// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage wrapper that delays reads, for widening race windows.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use lineoa_core::{AdapterType, HealthStatus, LineOaError, PluginAdapter, StorageAdapter};

/// Delegates to an inner backend, sleeping `read_latency` before each read.
pub struct SlowStorage {
    inner: Arc<dyn StorageAdapter>,
    read_latency: Duration,
}

impl SlowStorage {
    pub fn new(inner: Arc<dyn StorageAdapter>, read_latency: Duration) -> Self {
        Self {
            inner,
            read_latency,
        }
    }
}

#[async_trait]
impl PluginAdapter for SlowStorage {
    fn name(&self) -> &str {
        "slow"
    }

    fn version(&self) -> semver::Version {
        self.inner.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LineOaError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), LineOaError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl StorageAdapter for SlowStorage {
    async fn initialize(&self) -> Result<(), LineOaError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), LineOaError> {
        self.inner.close().await
    }

    async fn read_record(&self, key: &str) -> Result<Option<String>, LineOaError> {
        tokio::time::sleep(self.read_latency).await;
        self.inner.read_record(key).await
    }

    async fn write_record(&self, key: &str, value: &str) -> Result<(), LineOaError> {
        self.inner.write_record(key, value).await
    }
}
