// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process record storage for tests and `--ephemeral` runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lineoa_core::{AdapterType, HealthStatus, LineOaError, PluginAdapter, StorageAdapter};

/// Records held in a map; nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a raw record, bypassing serialization.
    pub fn with_record(mut self, key: &str, value: &str) -> Self {
        self.records
            .get_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LineOaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LineOaError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), LineOaError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), LineOaError> {
        Ok(())
    }

    async fn read_record(&self, key: &str) -> Result<Option<String>, LineOaError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn write_record(&self, key: &str, value: &str) -> Result<(), LineOaError> {
        self.records
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
