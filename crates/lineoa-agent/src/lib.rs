// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message handling for the LineOA console.
//!
//! [`MessagePipeline`] turns an inbound text into a persisted conversation
//! turn: keyword rules first, then the AI responder when enabled.
//! [`Broadcaster`] fans one outbound message out to every contact.

pub mod broadcast;
pub mod pipeline;
pub mod rules;
pub mod shutdown;

pub use broadcast::{BroadcastReport, Broadcaster, BROADCAST_MAX_CHARS};
pub use pipeline::{MessagePipeline, PipelineOptions, ReplySource, Resolution};
pub use rules::find_matching_rule;
