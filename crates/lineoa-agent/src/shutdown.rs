// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown: signal handling and draining of in-flight
//! pipeline invocations.
//!
//! Invocations are never cancelled once started. Callers spawn them on a
//! [`TaskTracker`] and shutdown waits for the tracker to empty.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Returns a token cancelled on SIGINT (Ctrl+C) or SIGTERM.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        trigger.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
            }
        }
        Err(e) => {
            warn!(error = %e, "SIGTERM handler unavailable; listening for Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
            info!("received SIGINT (Ctrl+C), initiating shutdown");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received Ctrl+C, initiating shutdown");
}

/// Closes `tracker` and waits up to `timeout` for its tasks to finish.
///
/// Returns true when everything finished in time.
pub async fn drain_invocations(tracker: &TaskTracker, timeout: Duration) -> bool {
    tracker.close();
    if tracker.is_empty() {
        info!("no in-flight invocations to drain");
        return true;
    }

    info!(count = tracker.len(), "waiting for in-flight invocations");
    match tokio::time::timeout(timeout, tracker.wait()).await {
        Ok(()) => {
            info!("all invocations finished");
            true
        }
        Err(_) => {
            warn!(
                remaining = tracker.len(),
                timeout_secs = timeout.as_secs(),
                "drain timed out"
            );
            false
        }
    }
}
