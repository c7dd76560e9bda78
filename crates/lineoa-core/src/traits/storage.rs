// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for key-value record backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::error::LineOaError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the console's key-value persistence backend.
///
/// A backend stores opaque string records under string keys. It knows
/// nothing about contacts or rules: structural parsing, seeding, and the
/// reseed-on-malformed policy live one level up in the console store.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), LineOaError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), LineOaError>;

    /// Reads the raw record stored under `key`, if any.
    async fn read_record(&self, key: &str) -> Result<Option<String>, LineOaError>;

    /// Overwrites the record stored under `key`.
    async fn write_record(&self, key: &str, value: &str) -> Result<(), LineOaError>;
}
