// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-notification bus for the console's record store.
//!
//! Subscribers are kept in an explicit, ordered list. [`EventBus::publish`]
//! delivers to them in subscription order and reports which ones were
//! reached, so fan-out is deterministic and observable in tests.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// What changed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    ContactsChanged,
    RulesChanged,
    SettingsChanged,
}

impl StoreEvent {
    /// Event name used on the wire (SSE `event:` field).
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContactsChanged => "contacts_changed",
            Self::RulesChanged => "rules_changed",
            Self::SettingsChanged => "settings_changed",
        }
    }
}

/// A published event with its envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    pub id: String,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: StoreEvent,
}

impl BusEvent {
    fn new(event: StoreEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            at: Utc::now(),
            event,
        }
    }
}

struct Subscriber {
    id: u64,
    name: String,
    tx: mpsc::UnboundedSender<BusEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Ordered fan-out of [`StoreEvent`]s.
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber at the end of the delivery order.
    pub fn subscribe(&self, name: impl Into<String>) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let name = name.into();
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push(Subscriber {
            id,
            name: name.clone(),
            tx,
        });
        tracing::debug!(subscriber = %name, "bus subscriber added");
        Subscription { id, name, rx }
    }

    /// Removes a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut registry = self.lock();
        let before = registry.subscribers.len();
        registry.subscribers.retain(|s| s.id != subscription.id);
        registry.subscribers.len() != before
    }

    /// Delivers `event` to every live subscriber in subscription order.
    ///
    /// Subscribers whose receiving half was dropped are pruned. The returned
    /// names are exactly the subscribers that received the event.
    pub fn publish(&self, event: StoreEvent) -> Vec<String> {
        let envelope = BusEvent::new(event);
        let mut registry = self.lock();
        let mut reached = Vec::with_capacity(registry.subscribers.len());
        registry.subscribers.retain(|s| {
            if s.tx.send(envelope.clone()).is_ok() {
                reached.push(s.name.clone());
                true
            } else {
                tracing::debug!(subscriber = %s.name, "pruning closed bus subscriber");
                false
            }
        });
        tracing::trace!(event = event.name(), delivered = reached.len(), "bus publish");
        reached
    }

    /// Names of the current subscribers, in delivery order.
    pub fn subscribers(&self) -> Vec<String> {
        self.lock()
            .subscribers
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        // The registry holds no invariants a panicking holder could break.
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Receiving end of a bus subscription.
pub struct Subscription {
    id: u64,
    name: String,
    rx: mpsc::UnboundedReceiver<BusEvent>,
}

impl Subscription {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the next event. `None` once the subscriber was removed.
    pub async fn recv(&mut self) -> Option<BusEvent> {
        self.rx.recv().await
    }

    /// Returns an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<BusEvent> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_subscribers_in_order() {
        let bus = EventBus::new();
        let _a = bus.subscribe("inbox");
        let _b = bus.subscribe("sse");
        let _c = bus.subscribe("cli");
        assert_eq!(
            bus.publish(StoreEvent::ContactsChanged),
            vec!["inbox", "sse", "cli"]
        );
    }

    #[test]
    fn publish_with_no_subscribers_reaches_nobody() {
        let bus = EventBus::new();
        assert!(bus.publish(StoreEvent::RulesChanged).is_empty());
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let bus = EventBus::new();
        let keep = bus.subscribe("keep");
        let gone = bus.subscribe("gone");
        drop(gone);
        assert_eq!(bus.publish(StoreEvent::SettingsChanged), vec!["keep"]);
        assert_eq!(bus.subscribers(), vec!["keep"]);
        drop(keep);
    }

    #[test]
    fn unsubscribe_removes_exactly_once() {
        let bus = EventBus::new();
        let sub = bus.subscribe("x");
        assert!(bus.unsubscribe(&sub));
        assert!(!bus.unsubscribe(&sub));
        assert!(bus.publish(StoreEvent::ContactsChanged).is_empty());
    }

    #[tokio::test]
    async fn subscriber_receives_event_payload() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe("inbox");
        bus.publish(StoreEvent::ContactsChanged);
        bus.publish(StoreEvent::RulesChanged);
        assert_eq!(sub.recv().await.unwrap().event, StoreEvent::ContactsChanged);
        assert_eq!(sub.recv().await.unwrap().event, StoreEvent::RulesChanged);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_value(BusEvent::new(StoreEvent::ContactsChanged)).unwrap();
        assert_eq!(json["type"], "contacts_changed");
        assert!(json["id"].is_string());
    }
}
