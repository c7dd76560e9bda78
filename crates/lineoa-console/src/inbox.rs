// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-contact inbox: listing, focus, read state, manual replies, deletion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use lineoa_core::{Contact, LineOaError, Message};
use lineoa_storage::ConsoleStore;

/// One row of the contact list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: String,
    pub display_name: String,
    pub picture_url: String,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: u32,
    pub last_active: DateTime<Utc>,
}

impl From<&Contact> for ContactSummary {
    fn from(c: &Contact) -> Self {
        let last = c.last_message();
        Self {
            id: c.id.clone(),
            display_name: c.display_name.clone(),
            picture_url: c.picture_url.clone(),
            last_message: last.map(|m| m.text.clone()),
            last_message_at: last.map(|m| m.timestamp),
            unread_count: c.unread_count,
            last_active: c.last_active,
        }
    }
}

/// Operator view over the contact list and the focused conversation.
pub struct Inbox {
    store: Arc<ConsoleStore>,
}

impl Inbox {
    pub fn new(store: Arc<ConsoleStore>) -> Self {
        Self { store }
    }

    /// Contacts, most recently active first.
    pub async fn list(&self) -> Result<Vec<ContactSummary>, LineOaError> {
        Ok(self
            .store
            .get_contacts()
            .await?
            .iter()
            .map(ContactSummary::from)
            .collect())
    }

    /// Contacts whose display name contains `query`, case-insensitively.
    pub async fn search(&self, query: &str) -> Result<Vec<ContactSummary>, LineOaError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .store
            .get_contacts()
            .await?
            .iter()
            .filter(|c| c.display_name.to_lowercase().contains(&needle))
            .map(ContactSummary::from)
            .collect())
    }

    /// Full contact with history, without touching focus or read state.
    pub async fn get(&self, id: &str) -> Result<Contact, LineOaError> {
        self.store
            .get_contacts()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LineOaError::contact_not_found(id))
    }

    /// Focuses the contact and marks it read.
    ///
    /// Focus is set before the unread reset so an inbound message racing the
    /// open cannot count as unread. A missing contact restores the previous
    /// focus.
    pub async fn open(&self, id: &str) -> Result<Contact, LineOaError> {
        let previous = self.store.focused();
        self.store.set_focus(Some(id.to_string()));
        match self.mark_read(id).await {
            Ok(contact) => Ok(contact),
            Err(e) => {
                self.store.set_focus(previous);
                Err(e)
            }
        }
    }

    /// Resets the unread counter to zero.
    pub async fn mark_read(&self, id: &str) -> Result<Contact, LineOaError> {
        self.store
            .update_contact(id, |c| {
                c.unread_count = 0;
                c.clone()
            })
            .await?
            .ok_or_else(|| LineOaError::contact_not_found(id))
    }

    /// Appends a manual `bot` reply and bumps last-active.
    pub async fn reply(&self, id: &str, text: &str) -> Result<Message, LineOaError> {
        if text.trim().is_empty() {
            return Err(LineOaError::Validation(
                "reply text must not be empty".to_string(),
            ));
        }
        let message = Message::bot(text);
        let stored = message.clone();
        self.store
            .update_contact(id, move |c| {
                c.last_active = stored.timestamp;
                c.messages.push(stored);
            })
            .await?
            .ok_or_else(|| LineOaError::contact_not_found(id))?;
        info!(contact_id = id, "manual reply sent");
        Ok(message)
    }

    pub async fn delete(&self, id: &str) -> Result<(), LineOaError> {
        if self.store.remove_contact(id).await? {
            Ok(())
        } else {
            Err(LineOaError::contact_not_found(id))
        }
    }

    /// Clears focus.
    pub fn close(&self) {
        self.store.set_focus(None);
    }

    pub fn focused(&self) -> Option<String> {
        self.store.focused()
    }
}
