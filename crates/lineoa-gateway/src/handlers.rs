// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the console API.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lineoa_agent::{BroadcastReport, Resolution};
use lineoa_console::flex::{self, FlexReport};
use lineoa_console::richmenu::{self, MenuTemplate, RichMenuDraft};
use lineoa_console::{ContactSummary, DashboardStats, RuleDraft, WebhookCheck};
use lineoa_core::{Contact, HealthStatus, KeywordRule, LineOaError, Message, SystemSettings};

use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub storage: String,
    pub responder: String,
}

/// `?q=` filter on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Body for POST /api/inbox/{id}/reply, /api/broadcast and /api/chatbot.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Request body for POST /api/simulate.
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub text: String,
    /// Defaults to the most recently active contact.
    #[serde(default)]
    pub contact_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PersonaRequest {
    pub persona: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookUrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ChatbotState {
    pub persona: String,
    pub transcript: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct MenuValidation {
    pub valid: bool,
    pub issues: Vec<String>,
    /// Messaging API rich menu object, when valid.
    pub menu: Option<Value>,
}

fn health_label(status: Result<HealthStatus, LineOaError>) -> String {
    match status {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
        Ok(HealthStatus::Unhealthy(reason)) => format!("unhealthy: {reason}"),
        Err(e) => format!("unhealthy: {e}"),
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let storage = health_label(state.store.backend().health_check().await);
    let responder = health_label(state.pipeline.responder().health_check().await);
    let status = if storage == "healthy" { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        storage,
        responder,
    })
}

/// GET /api/dashboard
pub async fn get_dashboard(State(state): State<GatewayState>) -> ApiResult<DashboardStats> {
    Ok(Json(DashboardStats::load(&state.store).await?))
}

/// GET /api/rules
pub async fn list_rules(
    State(state): State<GatewayState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<KeywordRule>> {
    let rules = match query.q {
        Some(q) => state.rules.search(&q).await?,
        None => state.rules.list().await?,
    };
    Ok(Json(rules))
}

/// POST /api/rules
pub async fn create_rule(
    State(state): State<GatewayState>,
    Json(draft): Json<RuleDraft>,
) -> Result<(StatusCode, Json<KeywordRule>), ApiError> {
    let rule = state.rules.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// PUT /api/rules/{id}
pub async fn update_rule(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(draft): Json<RuleDraft>,
) -> ApiResult<KeywordRule> {
    Ok(Json(state.rules.update(&id, &draft).await?))
}

/// POST /api/rules/{id}/toggle
pub async fn toggle_rule(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<KeywordRule> {
    Ok(Json(state.rules.toggle(&id).await?))
}

/// DELETE /api/rules/{id}
pub async fn delete_rule(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.rules.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/inbox
pub async fn list_inbox(
    State(state): State<GatewayState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<ContactSummary>> {
    let contacts = match query.q {
        Some(q) => state.inbox.search(&q).await?,
        None => state.inbox.list().await?,
    };
    Ok(Json(contacts))
}

/// GET /api/inbox/{id}
pub async fn get_contact(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    Ok(Json(state.inbox.get(&id).await?))
}

/// POST /api/inbox/{id}/read
///
/// Focuses the contact and clears its unread count.
pub async fn open_contact(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    Ok(Json(state.inbox.open(&id).await?))
}

/// DELETE /api/inbox/focus
pub async fn close_focus(State(state): State<GatewayState>) -> StatusCode {
    state.inbox.close();
    StatusCode::NO_CONTENT
}

/// POST /api/inbox/{id}/reply
pub async fn reply_contact(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = state.inbox.reply(&id, &body.text).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /api/inbox/{id}
pub async fn delete_contact(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.inbox.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/broadcast
pub async fn post_broadcast(
    State(state): State<GatewayState>,
    Json(body): Json<TextRequest>,
) -> ApiResult<BroadcastReport> {
    Ok(Json(state.broadcaster.broadcast(&body.text).await?))
}

/// GET /api/settings
pub async fn get_settings(State(state): State<GatewayState>) -> ApiResult<SystemSettings> {
    Ok(Json(state.settings.get().await?))
}

/// PUT /api/settings
pub async fn put_settings(
    State(state): State<GatewayState>,
    Json(settings): Json<SystemSettings>,
) -> ApiResult<SystemSettings> {
    state.settings.update(&settings).await?;
    Ok(Json(settings))
}

/// GET /api/settings/webhook
pub async fn get_webhook(State(state): State<GatewayState>) -> Json<WebhookUrlResponse> {
    Json(WebhookUrlResponse {
        url: state.settings.webhook_url(),
    })
}

/// POST /api/settings/webhook/check
pub async fn check_webhook(State(state): State<GatewayState>) -> ApiResult<WebhookCheck> {
    Ok(Json(state.settings.check_webhook().await?))
}

/// POST /api/simulate
///
/// Runs one pipeline invocation on the server's task tracker and waits for
/// it. The invocation finishes even if the client goes away.
pub async fn post_simulate(
    State(state): State<GatewayState>,
    Json(body): Json<SimulateRequest>,
) -> ApiResult<Resolution> {
    if body.text.trim().is_empty() {
        return Err(LineOaError::Validation("test message must not be empty".to_string()).into());
    }
    let pipeline = state.pipeline.clone();
    let handle = state.tracker.spawn(async move {
        pipeline
            .resolve_detailed(&body.text, body.contact_id.as_deref())
            .await
    });
    let resolution = handle
        .await
        .map_err(|e| LineOaError::Internal(format!("pipeline task failed: {e}")))??;
    Ok(Json(resolution))
}

/// GET /api/chatbot
pub async fn get_chatbot(State(state): State<GatewayState>) -> Json<ChatbotState> {
    let playground = state.playground.lock().await;
    Json(ChatbotState {
        persona: playground.persona().to_string(),
        transcript: playground.transcript().to_vec(),
    })
}

/// POST /api/chatbot
pub async fn post_chatbot(
    State(state): State<GatewayState>,
    Json(body): Json<TextRequest>,
) -> ApiResult<Message> {
    let mut playground = state.playground.lock().await;
    Ok(Json(playground.send(&body.text).await?))
}

/// PUT /api/chatbot/persona
pub async fn put_persona(
    State(state): State<GatewayState>,
    Json(body): Json<PersonaRequest>,
) -> StatusCode {
    state.playground.lock().await.set_persona(body.persona);
    StatusCode::NO_CONTENT
}

/// DELETE /api/chatbot
pub async fn clear_chatbot(State(state): State<GatewayState>) -> StatusCode {
    state.playground.lock().await.clear();
    StatusCode::NO_CONTENT
}

/// GET /api/richmenu/templates
pub async fn get_menu_templates() -> Json<&'static [MenuTemplate]> {
    Json(richmenu::templates())
}

/// POST /api/richmenu/validate
pub async fn validate_menu(Json(draft): Json<RichMenuDraft>) -> Json<MenuValidation> {
    let issues = draft.issues();
    let menu = if issues.is_empty() {
        draft.to_line_json().ok()
    } else {
        None
    };
    Json(MenuValidation {
        valid: issues.is_empty(),
        issues,
        menu,
    })
}

/// GET /api/flex/sample
pub async fn get_flex_sample() -> ApiResult<FlexReport> {
    Ok(Json(flex::validate(flex::SAMPLE_BUBBLE)?))
}

/// POST /api/flex/validate
///
/// Takes the raw JSON payload as the body.
pub async fn validate_flex(body: String) -> ApiResult<FlexReport> {
    Ok(Json(flex::validate(&body)?))
}
