// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the LineOA console.

use thiserror::Error;

/// The primary error type used across all LineOA crates.
#[derive(Debug, Error)]
pub enum LineOaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// AI provider errors (missing credential, transport failure, remote error).
    ///
    /// Never reaches the pipeline: the responder converts it to fallback text.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Rejected operator input (empty keyword list, empty message text, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// JSON encoding of a record failed.
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LineOaError {
    /// Shorthand for a missing contact.
    pub fn contact_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "contact".to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing keyword rule.
    pub fn rule_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "rule".to_string(),
            id: id.to_string(),
        }
    }
}
