// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, the pipeline, and the console views.
//!
//! Serialized field names match the console's persisted record layout
//! (camelCase), so records written by older console builds still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Display name given to a contact synthesized by the pipeline.
pub const NEW_CUSTOMER_NAME: &str = "New Customer";

/// Avatar given to a contact synthesized by the pipeline.
pub const NEW_CUSTOMER_AVATAR: &str = "https://ui-avatars.com/api/?name=New+User&background=random";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Responder,
}

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    /// The customer (inbound).
    User,
    /// The account: rule replies, AI replies, manual replies, broadcasts.
    Bot,
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp,
        }
    }

    /// An inbound message from the customer, stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, Utc::now())
    }

    /// An outbound message from the account, stamped now.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text, Utc::now())
    }

    /// An outbound broadcast message. Broadcast ids carry a `bc_` prefix.
    pub fn broadcast(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("bc_{}", uuid::Uuid::new_v4().simple()),
            sender: Sender::Bot,
            text: text.into(),
            timestamp,
        }
    }
}

/// A conversation counterparty and its message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Internal identifier.
    pub id: String,
    /// External platform identifier (`U` followed by 32 hex digits on LINE).
    pub user_id: String,
    pub display_name: String,
    pub picture_url: String,
    /// Conversation order. Appended to, never reordered.
    pub messages: Vec<Message>,
    pub unread_count: u32,
    pub last_active: DateTime<Utc>,
}

impl Contact {
    /// Synthesizes a placeholder contact with an empty history.
    pub fn new_customer() -> Self {
        let raw = uuid::Uuid::new_v4();
        Self {
            id: raw.to_string(),
            user_id: format!("U{}", raw.simple()),
            display_name: NEW_CUSTOMER_NAME.to_string(),
            picture_url: NEW_CUSTOMER_AVATAR.to_string(),
            messages: Vec::new(),
            unread_count: 0,
            last_active: Utc::now(),
        }
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Appends a message and bumps the last-active timestamp to its time.
    pub fn push_message(&mut self, message: Message) {
        if message.timestamp > self.last_active {
            self.last_active = message.timestamp;
        }
        self.messages.push(message);
    }
}

/// A keyword-triggered canned reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRule {
    pub id: String,
    pub keywords: Vec<String>,
    pub response: String,
    pub is_active: bool,
}

impl KeywordRule {
    /// Creates a new active rule with a generated id.
    pub fn new(keywords: Vec<String>, response: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            keywords,
            response: response.into(),
            is_active: true,
        }
    }

    /// Whether any keyword is a case-insensitive substring of `text`.
    ///
    /// Matching is not tokenized: a keyword embedded inside a longer word
    /// still matches. Empty keywords never match. The active flag is not
    /// consulted here.
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| haystack.contains(&k.to_lowercase()))
    }
}

/// Singleton console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    /// Channel access token. Opaque, never validated.
    pub channel_token: String,
    /// Channel secret. Opaque, never validated.
    pub channel_secret: String,
    pub is_ai_enabled: bool,
    /// Persona instruction handed to the AI responder.
    pub ai_system_instruction: String,
    pub save_logs: bool,
}
