// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-facing console operations.
//!
//! Each module is one console view reduced to its state transitions; the
//! HTTP gateway and the CLI are thin shells over these. Input validation
//! happens here, before anything reaches the pipeline or the store.

pub mod chatbot;
pub mod dashboard;
pub mod flex;
pub mod inbox;
pub mod richmenu;
pub mod rules_editor;
pub mod settings;

pub use chatbot::ChatPlayground;
pub use dashboard::DashboardStats;
pub use flex::FlexReport;
pub use inbox::{ContactSummary, Inbox};
pub use richmenu::{AreaAction, MenuTemplate, RichMenuDraft};
pub use rules_editor::{RuleDraft, RulesEditor};
pub use settings::{SettingsView, WebhookCheck};
