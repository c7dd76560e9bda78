// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles a console stack around a [`MockResponder`].
//!
//! The default harness uses in-memory storage, seeded records and a
//! pipeline with zero delays.

use std::sync::Arc;
use std::time::Duration;

use lineoa_agent::{Broadcaster, MessagePipeline, PipelineOptions};
use lineoa_bus::EventBus;
use lineoa_config::model::StorageConfig;
use lineoa_core::{Contact, KeywordRule, LineOaError, SystemSettings};
use lineoa_storage::{ConsoleStore, MemoryStorage};

use crate::mock_responder::MockResponder;
use crate::slow_storage::SlowStorage;

pub struct TestHarnessBuilder {
    responder: MockResponder,
    options: PipelineOptions,
    contacts: Option<Vec<Contact>>,
    rules: Option<Vec<KeywordRule>>,
    ai_enabled: Option<bool>,
    sqlite: bool,
    read_latency: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responder: MockResponder::new(),
            options: PipelineOptions::immediate(),
            contacts: None,
            rules: None,
            ai_enabled: None,
            sqlite: false,
            read_latency: None,
        }
    }

    pub fn with_responder(mut self, responder: MockResponder) -> Self {
        self.responder = responder;
        self
    }

    pub fn with_responses<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_responder(MockResponder::with_responses(responses))
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the seeded contact list.
    pub fn with_contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.contacts = Some(contacts);
        self
    }

    /// Starts from an empty contact list.
    pub fn with_empty_inbox(self) -> Self {
        self.with_contacts(Vec::new())
    }

    /// Replaces the seeded rules.
    pub fn with_rules(mut self, rules: Vec<KeywordRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_ai_enabled(mut self, enabled: bool) -> Self {
        self.ai_enabled = Some(enabled);
        self
    }

    /// Uses a SQLite file in a temporary directory instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Delays every in-memory record read by `latency`.
    pub fn with_read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = Some(latency);
        self
    }

    pub async fn build(self) -> Result<TestHarness, LineOaError> {
        let bus = Arc::new(EventBus::new());
        let (store, temp_dir) = if self.sqlite {
            let dir = tempfile::TempDir::new().map_err(|e| LineOaError::Storage {
                source: Box::new(e),
            })?;
            let config = StorageConfig {
                database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
                wal_mode: true,
            };
            (ConsoleStore::open(&config, bus.clone()).await?, Some(dir))
        } else if let Some(latency) = self.read_latency {
            let backend = SlowStorage::new(Arc::new(MemoryStorage::new()), latency);
            (ConsoleStore::new(Arc::new(backend), bus.clone()), None)
        } else {
            (ConsoleStore::ephemeral(bus.clone()), None)
        };
        let store = Arc::new(store);

        if let Some(contacts) = &self.contacts {
            store.save_contacts(contacts).await?;
        }
        if let Some(rules) = &self.rules {
            store.save_rules(rules).await?;
        }
        if let Some(enabled) = self.ai_enabled {
            let settings = SystemSettings {
                is_ai_enabled: enabled,
                ..store.get_settings().await?
            };
            store.save_settings(&settings).await?;
        }

        let responder = Arc::new(self.responder);
        let pipeline = Arc::new(MessagePipeline::new(
            store.clone(),
            responder.clone(),
            self.options,
        ));
        let broadcaster = Broadcaster::new(store.clone());

        Ok(TestHarness {
            bus,
            store,
            responder,
            pipeline,
            broadcaster,
            _temp_dir: temp_dir,
        })
    }
}

/// A wired console stack for tests.
pub struct TestHarness {
    pub bus: Arc<EventBus>,
    pub store: Arc<ConsoleStore>,
    pub responder: Arc<MockResponder>,
    pub pipeline: Arc<MessagePipeline>,
    pub broadcaster: Broadcaster,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Seeded records, default mock responder, immediate pipeline.
    pub async fn new() -> Result<Self, LineOaError> {
        Self::builder().build().await
    }

    /// Current state of one contact.
    pub async fn contact(&self, id: &str) -> Result<Contact, LineOaError> {
        self.store
            .get_contacts()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LineOaError::contact_not_found(id))
    }
}
