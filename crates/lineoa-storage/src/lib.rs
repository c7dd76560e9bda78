// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store for the LineOA console.
//!
//! Three named JSON records (contacts, keyword rules, settings) live behind
//! a [`StorageAdapter`](lineoa_core::StorageAdapter) backend. [`ConsoleStore`]
//! layers the seed/reseed policy, contact ordering, the contact write lock,
//! inbox focus and change notification on top of it.

pub mod adapter;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod seed;
pub mod store;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use memory::MemoryStorage;
pub use store::{ConsoleStore, RecordStatus};

/// Record key holding the contact list.
pub const CONTACTS_KEY: &str = "line_oa_inbox_data";
/// Record key holding the keyword rules.
pub const RULES_KEY: &str = "line_oa_autoreply_rules";
/// Record key holding the settings singleton.
pub const SETTINGS_KEY: &str = "line_oa_settings";
