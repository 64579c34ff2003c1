//! HTTP surface for the router.
//!
//! Thin axum layer over [`Router`]: request DTOs are extracted leniently
//! (`Option` fields, raw JSON for toggles) so missing fields produce the
//! documented 400 with an `{"error": ...}` body rather than a framework
//! rejection. Every error path returns JSON; no error crashes the process.
//!
//! `/complete` pipes the provider's byte stream straight through as
//! `text/event-stream`. Once those headers are sent the status can no
//! longer change, so mid-stream failures only abort the body and are
//! logged.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use chrono::Utc;
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::cache::ResponseCache;
use crate::config::ConfigSource;
use crate::error::RouterError;
use crate::providers::{ProviderId, ProviderReply};
use crate::router::{RefactorFile, Router};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub cache: Arc<ResponseCache>,
    pub config: Arc<dyn ConfigSource>,
}

/// Build the axum application with all routes registered.
pub fn app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/complete", post(complete))
        .route("/refactor", post(refactor))
        .route("/config", get(get_config))
        .route("/health", get(health))
        .route("/cache/clear", post(cache_clear))
        .route("/cache/stats", get(cache_stats))
        .route("/cache/toggle", put(cache_toggle))
        .with_state(state)
}

impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
struct CompleteRequest {
    prompt: Option<String>,
    context: Option<String>,
}

async fn complete(
    State(state): State<AppState>,
    Json(request): Json<CompleteRequest>,
) -> Result<Response, RouterError> {
    let prompt = request.prompt.as_deref().unwrap_or("");
    let reply = state
        .router
        .complete(prompt, request.context.as_deref())
        .await?;

    match reply {
        ProviderReply::Stream(stream) => {
            let stream = stream
                .inspect_err(|e| warn!(error = %e, "error while relaying upstream stream"));
            let headers = [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ];
            Ok((headers, Body::from_stream(stream)).into_response())
        }
        // Adapters stream this endpoint; buffered is the degenerate case.
        ProviderReply::Buffered(value) => Ok(Json(value).into_response()),
    }
}

#[derive(Deserialize)]
struct RefactorRequest {
    #[serde(default)]
    files: Vec<RefactorFile>,
    instruction: Option<String>,
}

#[derive(Serialize)]
struct RefactorResponse {
    result: Value,
    provider: String,
    model: String,
    cached: bool,
}

async fn refactor(
    State(state): State<AppState>,
    Json(request): Json<RefactorRequest>,
) -> Result<Json<RefactorResponse>, RouterError> {
    let instruction = request.instruction.as_deref().unwrap_or("");
    let outcome = state.router.refactor(&request.files, instruction).await?;
    Ok(Json(RefactorResponse {
        result: outcome.result,
        provider: outcome.provider,
        model: outcome.model,
        cached: outcome.cached,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigResponse {
    provider: String,
    model: String,
    available_providers: Vec<&'static str>,
    cache_enabled: bool,
    cache_size: usize,
    max_cache_size: usize,
}

/// Current configuration. Credentials are never included.
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let snapshot = state.config.load();
    let stats = state.cache.stats();
    Json(ConfigResponse {
        provider: snapshot.provider,
        model: snapshot.model,
        available_providers: ProviderId::ALL.iter().map(|id| id.as_str()).collect(),
        cache_enabled: stats.enabled,
        cache_size: stats.size,
        max_cache_size: stats.capacity,
    })
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "config": state.config.load().provider,
    }))
}

async fn cache_clear(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.cache.clear();
    Json(json!({
        "success": true,
        "clearedEntries": cleared,
        "message": format!("Cleared {cleared} cache entries"),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    enabled: bool,
    size: usize,
    max_size: usize,
    ttl: u64,
}

async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse {
        enabled: stats.enabled,
        size: stats.size,
        max_size: stats.capacity,
        ttl: stats.ttl_secs,
    })
}

async fn cache_toggle(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, RouterError> {
    let enabled = body
        .get("enabled")
        .and_then(Value::as_bool)
        .ok_or_else(|| RouterError::Validation("enabled must be a boolean".to_string()))?;

    state.cache.set_enabled(enabled);
    Ok(Json(json!({
        "success": true,
        "cacheEnabled": enabled,
        "message": if enabled { "Cache enabled" } else { "Cache disabled" },
    })))
}
