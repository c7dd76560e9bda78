// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lineoa serve` command implementation.
//!
//! Serves the console API until SIGINT/SIGTERM, then waits for in-flight
//! pipeline invocations before returning.

use std::time::Duration;

use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use lineoa_agent::shutdown;
use lineoa_core::LineOaError;
use lineoa_gateway::{GatewayState, ServerConfig};

use crate::console::Console;

/// Upper bound on waiting for pending replies at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run_serve(console: &Console) -> Result<(), LineOaError> {
    info!(name = %console.config.console.name, "starting lineoa serve");

    let cancel = shutdown::install_signal_handler();
    let tracker = TaskTracker::new();

    let state = GatewayState::new(
        console.pipeline.clone(),
        &console.config.console.webhook_origin,
        tracker.clone(),
    );
    let server_config = ServerConfig::from(&console.config.gateway);

    lineoa_gateway::start_server(&server_config, state, cancel).await?;

    if !shutdown::drain_invocations(&tracker, DRAIN_TIMEOUT).await {
        warn!("exiting with pipeline invocations still running");
    }
    info!("lineoa serve shutdown complete");
    Ok(())
}
