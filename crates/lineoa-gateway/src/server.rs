// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the console API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use lineoa_agent::{Broadcaster, MessagePipeline};
use lineoa_config::model::GatewayConfig;
use lineoa_console::{ChatPlayground, Inbox, RulesEditor, SettingsView};
use lineoa_core::LineOaError;
use lineoa_storage::ConsoleStore;

use crate::{handlers, sse};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<ConsoleStore>,
    pub pipeline: Arc<MessagePipeline>,
    pub broadcaster: Arc<Broadcaster>,
    pub rules: Arc<RulesEditor>,
    pub inbox: Arc<Inbox>,
    pub settings: Arc<SettingsView>,
    /// One playground per server; turns are serialized.
    pub playground: Arc<Mutex<ChatPlayground>>,
    /// In-flight pipeline invocations.
    pub tracker: TaskTracker,
    pub start_time: Instant,
}

impl GatewayState {
    /// Wires every view around one pipeline and its store.
    pub fn new(pipeline: Arc<MessagePipeline>, webhook_origin: &str, tracker: TaskTracker) -> Self {
        let store = pipeline.store().clone();
        Self {
            broadcaster: Arc::new(Broadcaster::new(store.clone())),
            rules: Arc::new(RulesEditor::new(store.clone())),
            inbox: Arc::new(Inbox::new(store.clone())),
            settings: Arc::new(SettingsView::new(pipeline.clone(), webhook_origin)),
            playground: Arc::new(Mutex::new(ChatPlayground::new(pipeline.responder().clone()))),
            store,
            pipeline,
            tracker,
            start_time: Instant::now(),
        }
    }
}

/// Bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// All console routes. `/api/webhook` is deliberately absent.
pub fn router(state: GatewayState) -> Router {
    let api = Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/rules", get(handlers::list_rules).post(handlers::create_rule))
        .route(
            "/rules/{id}",
            put(handlers::update_rule).delete(handlers::delete_rule),
        )
        .route("/rules/{id}/toggle", post(handlers::toggle_rule))
        .route("/inbox", get(handlers::list_inbox))
        .route("/inbox/events", get(sse::inbox_events))
        .route("/inbox/focus", delete(handlers::close_focus))
        .route(
            "/inbox/{id}",
            get(handlers::get_contact).delete(handlers::delete_contact),
        )
        .route("/inbox/{id}/read", post(handlers::open_contact))
        .route("/inbox/{id}/reply", post(handlers::reply_contact))
        .route("/broadcast", post(handlers::post_broadcast))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/settings/webhook", get(handlers::get_webhook))
        .route("/settings/webhook/check", post(handlers::check_webhook))
        .route("/simulate", post(handlers::post_simulate))
        .route(
            "/chatbot",
            get(handlers::get_chatbot)
                .post(handlers::post_chatbot)
                .delete(handlers::clear_chatbot),
        )
        .route("/chatbot/persona", put(handlers::put_persona))
        .route("/richmenu/templates", get(handlers::get_menu_templates))
        .route("/richmenu/validate", post(handlers::validate_menu))
        .route("/flex/sample", get(handlers::get_flex_sample))
        .route("/flex/validate", post(handlers::validate_flex));

    Router::new()
        .route("/health", get(handlers::get_health))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves the console API until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), LineOaError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LineOaError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("console API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| LineOaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
