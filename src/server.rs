//! HTTP server for the milestone catalog.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chatbot` | Answer a free-text query message |
//! | `GET`  | `/api/milestone/milestones` | Distinct milestone codes |
//! | `GET`  | `/api/milestone/domains` | Distinct domains |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/` | Plain-text liveness banner |
//!
//! # Error Contract
//!
//! Error responses carry a single message:
//!
//! ```json
//! { "error": "Message is required" }
//! ```
//!
//! A query that finds nothing is not an error: it returns `200` with an
//! explanatory `reply`. Validation failures and unrecognized messages
//! return `400`; store failures return `500`.
//!
//! # CORS
//!
//! Allowed origins come from `[server].cors_origins` (default
//! `http://localhost:3000`, the form UI's dev server). `"*"` allows any
//! origin.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use milestone_core::query::{QueryResult, QueryService};
use milestone_core::store::MilestoneStore;
use milestone_core::validate::{extract_message, ValidationError};

use crate::config::Config;
use crate::import;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: QueryService,
}

/// Starts the HTTP server against the configured SQLite database.
///
/// Creates the schema if needed and, when `[import].auto_import` is set,
/// loads the reference CSV into an empty store before binding. An import
/// failure is logged and the server still starts.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store: Arc<dyn MilestoneStore> = Arc::new(SqliteStore::open(config).await?);

    if config.import.auto_import {
        if let Err(e) = import::load_if_empty(store.as_ref(), &config.import.csv_path).await {
            tracing::error!(
                path = %config.import.csv_path.display(),
                error = %e,
                "reference data import failed"
            );
        }
    }

    run_server_with_store(config, store).await
}

/// Starts the HTTP server over an already-populated store.
pub async fn run_server_with_store(
    config: &Config,
    store: Arc<dyn MilestoneStore>,
) -> anyhow::Result<()> {
    let app = router(QueryService::new(store), &config.server.cors_origins)?;

    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the application router.
pub fn router(service: QueryService, cors_origins: &[String]) -> anyhow::Result<Router> {
    let state = AppState { service };

    Ok(Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/chatbot", post(handle_chatbot))
        .route("/api/milestone/milestones", get(handle_codes))
        .route("/api/milestone/domains", get(handle_domains))
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let values = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {}", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(values)))
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        bad_request(err.to_string())
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Constructs a 500 Internal Server Error.
fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

// ============ GET / and GET /health ============

async fn handle_root() -> &'static str {
    "Server running"
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/chatbot ============

#[derive(Serialize)]
struct ReplyBody {
    reply: String,
}

/// Handler for `POST /api/chatbot`.
///
/// Validates `{ "message": string }`, classifies the message, and runs the
/// matching lookup. Both `Found` and `NotFound` return `200` with a `reply`.
async fn handle_chatbot(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReplyBody>, AppError> {
    let body = request_json(&headers, &body)?;
    let message = extract_message(&body)?;

    let result = state.service.respond(message).await;
    if let Some(reply) = result.reply() {
        return Ok(Json(ReplyBody {
            reply: reply.to_string(),
        }));
    }
    match result {
        QueryResult::Failed => Err(internal("Server error occurred")),
        _ => Err(bad_request("Invalid request format")),
    }
}

/// Decode a request body as JSON. A body that is blank, or not declared as
/// JSON, reads as `{}` and so fails validation as a missing message.
fn request_json(headers: &HeaderMap, body: &[u8]) -> Result<serde_json::Value, ValidationError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}

// ============ GET /api/milestone/* ============

#[derive(Serialize)]
struct CodesResponse {
    #[serde(rename = "milestoneCodes")]
    milestone_codes: BTreeSet<String>,
}

#[derive(Serialize)]
struct DomainsResponse {
    domains: BTreeSet<String>,
}

async fn handle_codes(State(state): State<AppState>) -> Result<Json<CodesResponse>, AppError> {
    let milestone_codes = state.service.store().distinct_codes().await.map_err(|e| {
        tracing::error!(error = %format!("{e:#}"), "listing milestone codes failed");
        internal("Error fetching milestone codes")
    })?;
    Ok(Json(CodesResponse { milestone_codes }))
}

async fn handle_domains(State(state): State<AppState>) -> Result<Json<DomainsResponse>, AppError> {
    let domains = state.service.store().distinct_domains().await.map_err(|e| {
        tracing::error!(error = %format!("{e:#}"), "listing domains failed");
        internal("Error fetching domains")
    })?;
    Ok(Json(DomainsResponse { domains }))
}
