// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel settings, the advisory webhook URL, and the webhook simulator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};
use tracing::info;

use lineoa_agent::{MessagePipeline, Resolution};
use lineoa_core::{LineOaError, SystemSettings};

/// Path shown to operators for the LINE webhook. Nothing serves it.
pub const WEBHOOK_PATH: &str = "/api/webhook";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WebhookStatus {
    Idle,
    /// Always the result of a check; no request leaves the process.
    Active,
}

/// Result of a (simulated) webhook check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookCheck {
    pub status: WebhookStatus,
    pub url: String,
    /// Both the channel token and the channel secret are non-blank.
    pub credentials_present: bool,
    pub checked_at: DateTime<Utc>,
}

/// Settings page: stored settings, webhook URL and the message simulator.
pub struct SettingsView {
    pipeline: Arc<MessagePipeline>,
    webhook_origin: String,
}

impl SettingsView {
    pub fn new(pipeline: Arc<MessagePipeline>, webhook_origin: impl Into<String>) -> Self {
        Self {
            pipeline,
            webhook_origin: webhook_origin.into(),
        }
    }

    pub async fn get(&self) -> Result<SystemSettings, LineOaError> {
        self.pipeline.store().get_settings().await
    }

    /// Replaces the settings record. Token and secret are opaque.
    pub async fn update(&self, settings: &SystemSettings) -> Result<(), LineOaError> {
        self.pipeline.store().save_settings(settings).await?;
        info!(ai_enabled = settings.is_ai_enabled, "settings saved");
        Ok(())
    }

    /// `{origin}/api/webhook`.
    pub fn webhook_url(&self) -> String {
        webhook_url(&self.webhook_origin)
    }

    pub async fn check_webhook(&self) -> Result<WebhookCheck, LineOaError> {
        let settings = self.get().await?;
        Ok(WebhookCheck {
            status: WebhookStatus::Active,
            url: self.webhook_url(),
            credentials_present: !settings.channel_token.trim().is_empty()
                && !settings.channel_secret.trim().is_empty(),
            checked_at: Utc::now(),
        })
    }

    /// Feeds `text` through the pipeline as if it arrived from the most
    /// recently active contact.
    pub async fn simulate(&self, text: &str) -> Result<Resolution, LineOaError> {
        if text.trim().is_empty() {
            return Err(LineOaError::Validation(
                "test message must not be empty".to_string(),
            ));
        }
        self.pipeline.resolve_detailed(text, None).await
    }
}

pub fn webhook_url(origin: &str) -> String {
    format!("{}{WEBHOOK_PATH}", origin.trim_end_matches('/'))
}
