// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires config, store, responder and pipeline into one console.

use std::sync::Arc;

use tracing::info;

use lineoa_agent::{MessagePipeline, PipelineOptions};
use lineoa_bus::EventBus;
use lineoa_config::LineOaConfig;
use lineoa_core::{LineOaError, ResponderAdapter};
use lineoa_gemini::GeminiResponder;
use lineoa_storage::ConsoleStore;

pub struct Console {
    pub config: LineOaConfig,
    pub store: Arc<ConsoleStore>,
    pub pipeline: Arc<MessagePipeline>,
}

impl Console {
    pub async fn open(config: LineOaConfig, ephemeral: bool) -> Result<Self, LineOaError> {
        let bus = Arc::new(EventBus::new());
        let store = if ephemeral {
            info!("using in-memory records");
            ConsoleStore::ephemeral(bus)
        } else {
            info!(path = %config.storage.database_path, "opening record store");
            ConsoleStore::open(&config.storage, bus).await?
        };
        let store = Arc::new(store);

        let responder = GeminiResponder::new(&config.gemini);

        let pipeline = Arc::new(MessagePipeline::new(
            store.clone(),
            Arc::new(responder),
            PipelineOptions::from_config(&config.pipeline),
        ));

        Ok(Self {
            config,
            store,
            pipeline,
        })
    }

    pub async fn close(&self) -> Result<(), LineOaError> {
        self.store.close().await
    }
}
