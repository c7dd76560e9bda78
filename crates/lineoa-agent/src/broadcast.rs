// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-to-all outbound messages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use lineoa_core::{LineOaError, Message};
use lineoa_storage::ConsoleStore;

/// Longest accepted broadcast, in characters.
pub const BROADCAST_MAX_CHARS: usize = 1000;

/// What a successful broadcast did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    /// Contacts that received the message.
    pub recipients: usize,
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
}

/// Appends one message to every contact in a single contact-list write.
pub struct Broadcaster {
    store: Arc<ConsoleStore>,
}

impl Broadcaster {
    pub fn new(store: Arc<ConsoleStore>) -> Self {
        Self { store }
    }

    /// Appends the same `bot` message to every contact in one read-all /
    /// write-all pass and bumps every contact's last-active time.
    ///
    /// Blank text and text over [`BROADCAST_MAX_CHARS`] are rejected before
    /// the store is touched.
    pub async fn broadcast(&self, text: &str) -> Result<BroadcastReport, LineOaError> {
        validate_broadcast(text)?;

        let sent_at = Utc::now();
        let message = Message::broadcast(text, sent_at);
        let message_id = message.id.clone();

        let recipients = self
            .store
            .modify_contacts(move |contacts| {
                for contact in contacts.iter_mut() {
                    contact.messages.push(message.clone());
                    contact.last_active = sent_at;
                }
                contacts.len()
            })
            .await?;

        info!(recipients, message_id = %message_id, "broadcast sent");
        Ok(BroadcastReport {
            recipients,
            message_id,
            sent_at,
        })
    }
}

/// Checks broadcast text without sending it.
pub fn validate_broadcast(text: &str) -> Result<(), LineOaError> {
    if text.trim().is_empty() {
        return Err(LineOaError::Validation(
            "broadcast text must not be empty".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > BROADCAST_MAX_CHARS {
        return Err(LineOaError::Validation(format!(
            "broadcast text is {chars} characters; the limit is {BROADCAST_MAX_CHARS}"
        )));
    }
    Ok(())
}
