// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the LineOA operator console.
//!
//! This crate provides the domain types (contacts, messages, keyword rules,
//! system settings), the workspace error type, and the adapter traits that the
//! storage backends and the AI responder implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LineOaError;
pub use types::{
    AdapterType, Contact, HealthStatus, KeywordRule, Message, Sender, SystemSettings,
};

// Re-export all adapter traits at crate root.
pub use traits::{PluginAdapter, ResponderAdapter, StorageAdapter};
