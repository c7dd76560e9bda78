// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events stream of store changes for GET /api/inbox/events.
//!
//! Each connection holds its own bus subscription. The event name is the
//! change kind; the data is the JSON envelope:
//! ```text
//! event: contacts_changed
//! data: {"id":"…","at":"2026-…","type":"contacts_changed"}
//! ```
//! Clients re-fetch whatever the event names. The subscription is dropped
//! with the stream and pruned on the next publish.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};

use lineoa_bus::{BusEvent, Subscription};

use crate::server::GatewayState;

/// GET /api/inbox/events
pub async fn inbox_events(
    State(state): State<GatewayState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let name = format!("sse-{}", uuid::Uuid::new_v4().simple());
    tracing::debug!(subscriber = %name, "inbox event stream opened");
    let subscription = state.store.bus().subscribe(name);
    Sse::new(event_stream(subscription)).keep_alive(KeepAlive::default())
}

fn event_stream(subscription: Subscription) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(subscription, |mut sub| async move {
        let event = sub.recv().await?;
        Some((to_sse(&event), sub))
    })
}

fn to_sse(event: &BusEvent) -> Result<Event, axum::Error> {
    Event::default()
        .event(event.event.name())
        .id(event.id.clone())
        .json_data(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use lineoa_bus::{EventBus, StoreEvent};

    #[tokio::test]
    async fn stream_yields_published_events_in_order() {
        let bus = EventBus::new();
        let sub = bus.subscribe("sse-test");
        bus.publish(StoreEvent::RulesChanged);
        bus.publish(StoreEvent::ContactsChanged);

        let mut stream = Box::pin(event_stream(sub));
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn stream_ends_when_subscriber_removed() {
        let bus = EventBus::new();
        let sub = bus.subscribe("sse-test");
        assert!(bus.unsubscribe(&sub));
        let mut stream = Box::pin(event_stream(sub));
        assert!(stream.next().await.is_none());
    }
}
