// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message resolution.
//!
//! One invocation:
//! 1. reads contacts, rules and settings (three independent reads),
//! 2. picks the target contact, synthesizing one when needed,
//! 3. appends the inbound message and persists it,
//! 4. picks a reply: first matching active rule, else the AI responder when
//!    enabled, else nothing,
//! 5. waits the configured delay, re-reads contacts and appends the reply to
//!    the target if it still exists.
//!
//! Suspension points are the delay and the responder call. In
//! [`PipelineMode::Serialized`] whole invocations are ordered by a gate, so
//! turns never interleave. In [`PipelineMode::Concurrent`] they may, but
//! every write is still an atomic read-modify-write on the store.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use lineoa_config::model::{PipelineConfig, PipelineMode};
use lineoa_core::{Contact, LineOaError, Message, ResponderAdapter};
use lineoa_storage::ConsoleStore;

use crate::rules::find_matching_rule;

/// Reply used when the responder task itself fails.
pub const PIPELINE_FAILURE_REPLY: &str = "ขออภัย ระบบขัดข้องชั่วคราว";

/// Timing and ordering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub rule_reply_delay: Duration,
    pub ai_reply_delay: Duration,
    pub mode: PipelineMode,
}

impl PipelineOptions {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            rule_reply_delay: Duration::from_millis(config.rule_reply_delay_ms),
            ai_reply_delay: Duration::from_millis(config.ai_reply_delay_ms),
            mode: config.mode,
        }
    }

    /// No delays, serialized. What tests want.
    pub fn immediate() -> Self {
        Self {
            rule_reply_delay: Duration::ZERO,
            ai_reply_delay: Duration::ZERO,
            mode: PipelineMode::Serialized,
        }
    }

    pub fn with_mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplySource {
    Rule { rule_id: String },
    Ai,
}

/// Full outcome of one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub contact_id: String,
    /// The target was synthesized by this invocation.
    pub new_contact: bool,
    pub inbound: Message,
    pub reply: Option<Message>,
    pub source: Option<ReplySource>,
    /// The reply reached the store. False when the contact was deleted
    /// while the reply was pending.
    pub delivered: bool,
}

impl Resolution {
    /// Whether a reply was produced.
    pub fn handled(&self) -> bool {
        self.reply.is_some()
    }
}

/// Turns one inbound text into a stored message and, when a keyword rule or
/// the AI responder produces one, a stored reply.
///
/// In serialized mode whole turns are ordered by an internal gate. In
/// concurrent mode turns interleave at the reply delay and the responder
/// call, and each write is an atomic update of the contact list.
pub struct MessagePipeline {
    store: Arc<ConsoleStore>,
    responder: Arc<dyn ResponderAdapter>,
    options: PipelineOptions,
    gate: Mutex<()>,
}

impl MessagePipeline {
    pub fn new(
        store: Arc<ConsoleStore>,
        responder: Arc<dyn ResponderAdapter>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            responder,
            options,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<ConsoleStore> {
        &self.store
    }

    pub fn responder(&self) -> &Arc<dyn ResponderAdapter> {
        &self.responder
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Resolves `text` for `target` (or the most recent contact) and returns
    /// whether a reply was produced.
    pub async fn resolve(&self, text: &str, target: Option<&str>) -> Result<bool, LineOaError> {
        Ok(self.resolve_detailed(text, target).await?.handled())
    }

    /// Like [`resolve`](Self::resolve), returning the whole [`Resolution`].
    ///
    /// Only store failures are returned as errors.
    #[instrument(skip(self, text))]
    pub async fn resolve_detailed(
        &self,
        text: &str,
        target: Option<&str>,
    ) -> Result<Resolution, LineOaError> {
        let _turn = match self.options.mode {
            PipelineMode::Serialized => Some(self.gate.lock().await),
            PipelineMode::Concurrent => None,
        };
        self.run(text, target).await
    }

    async fn run(&self, text: &str, target: Option<&str>) -> Result<Resolution, LineOaError> {
        let contacts = self.store.get_contacts().await?;
        let rules = self.store.get_rules().await?;
        let settings = self.store.get_settings().await?;

        let (contact, new_contact) = select_target(&contacts, target);
        let contact_id = contact.id.clone();
        let inbound = Message::user(text);

        {
            let inbound = inbound.clone();
            let contact_id = contact_id.clone();
            let store = &self.store;
            self.store
                .modify_contacts(move |list| {
                    let idx = match list.iter().position(|c| c.id == contact_id) {
                        Some(idx) => idx,
                        None => {
                            list.insert(0, contact);
                            0
                        }
                    };
                    let entry = &mut list[idx];
                    entry.push_message(inbound);
                    // Focus is read under the contact lock.
                    if !store.is_focused(&entry.id) {
                        entry.unread_count += 1;
                    }
                })
                .await?;
        }
        info!(contact_id = %contact_id, new_contact, "inbound message stored");

        let (source, reply_text, delay) = match find_matching_rule(&rules, text) {
            Some(rule) => {
                debug!(rule_id = %rule.id, "keyword rule matched");
                (
                    Some(ReplySource::Rule {
                        rule_id: rule.id.clone(),
                    }),
                    rule.response.clone(),
                    self.options.rule_reply_delay,
                )
            }
            None if settings.is_ai_enabled => {
                let reply = self.ask_responder(text, &settings.ai_system_instruction).await;
                (Some(ReplySource::Ai), reply, self.options.ai_reply_delay)
            }
            None => (None, String::new(), Duration::ZERO),
        };

        if reply_text.is_empty() {
            debug!(contact_id = %contact_id, "no reply produced");
            return Ok(Resolution {
                contact_id,
                new_contact,
                inbound,
                reply: None,
                source: None,
                delivered: false,
            });
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let reply = Message::bot(reply_text);
        let delivered = {
            let reply = reply.clone();
            self.store
                .update_contact(&contact_id, move |c| c.messages.push(reply))
                .await?
                .is_some()
        };
        if delivered {
            info!(contact_id = %contact_id, source = ?source, "reply stored");
        } else {
            debug!(contact_id = %contact_id, "contact vanished before reply; dropped");
        }

        Ok(Resolution {
            contact_id,
            new_contact,
            inbound,
            reply: Some(reply),
            source,
            delivered,
        })
    }

    /// Runs the responder on its own task so a panicking adapter degrades
    /// to a fixed reply instead of tearing down the invocation.
    async fn ask_responder(&self, prompt: &str, persona: &str) -> String {
        let responder = Arc::clone(&self.responder);
        let prompt = prompt.to_string();
        let persona = persona.to_string();
        match tokio::spawn(async move { responder.generate(&prompt, &persona).await }).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "responder task failed");
                PIPELINE_FAILURE_REPLY.to_string()
            }
        }
    }
}

/// The explicitly requested contact, else the first (most recent) one,
/// else a freshly synthesized contact. The flag is true when synthesized.
fn select_target(contacts: &[Contact], target: Option<&str>) -> (Contact, bool) {
    let found = match target {
        Some(id) => contacts.iter().find(|c| c.id == id),
        None => contacts.first(),
    };
    match found {
        Some(contact) => (contact.clone(), false),
        None => (Contact::new_customer(), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            ..Contact::new_customer()
        }
    }

    #[test]
    fn explicit_target_is_selected() {
        let list = vec![contact("a"), contact("b")];
        let (c, new) = select_target(&list, Some("b"));
        assert_eq!(c.id, "b");
        assert!(!new);
    }

    #[test]
    fn no_target_takes_first() {
        let list = vec![contact("a"), contact("b")];
        assert_eq!(select_target(&list, None).0.id, "a");
    }

    #[test]
    fn unknown_target_synthesizes() {
        let list = vec![contact("a")];
        let (c, new) = select_target(&list, Some("zzz"));
        assert!(new);
        assert_ne!(c.id, "a");
        assert!(c.messages.is_empty());
    }

    #[test]
    fn empty_list_synthesizes() {
        let (c, new) = select_target(&[], None);
        assert!(new);
        assert!(c.user_id.starts_with('U'));
    }

    #[test]
    fn options_follow_config() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.rule_reply_delay, Duration::from_millis(500));
        assert_eq!(opts.ai_reply_delay, Duration::from_millis(1500));
        assert_eq!(opts.mode, PipelineMode::Serialized);
        let fast = PipelineOptions::immediate().with_mode(PipelineMode::Concurrent);
        assert!(fast.ai_reply_delay.is_zero());
        assert_eq!(fast.mode, PipelineMode::Concurrent);
    }
}
