//! HTTP API server.
//!
//! Exposes the analysis engine over a small JSON API. Authentication and
//! session handling belong to the surrounding deployment (reverse proxy or
//! gateway); this layer takes the resolved owner id from the request body.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/analyze` | Ingest a submission and return duplicate matches |
//! | `GET`  | `/api/submissions` | List all submissions with file counts |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "decode_error", "message": "failed to decode file 'a.rs': ..." } }
//! ```
//!
//! Codes: `owner_not_found` (404), `decode_error` (400), `cancelled` (408),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::analyze::run_analysis;
use crate::config::Config;
use crate::db;
use crate::error::Error;
use crate::models::SubmissionSummary;
use crate::store::sqlite::SqliteStore;
use crate::store::SubmissionStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<SqliteStore>,
}

/// Starts the HTTP server on the address configured in `[server].bind`.
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(config).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(SqliteStore::new(pool)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/analyze", post(handle_analyze))
        .route("/api/submissions", get(handle_list_submissions))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("labscan server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"decode_error"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::OwnerNotFound(_) => (StatusCode::NOT_FOUND, "owner_not_found"),
            Error::Decode { .. } => (StatusCode::BAD_REQUEST, "decode_error"),
            Error::Cancelled => (StatusCode::REQUEST_TIMEOUT, "cancelled"),
            Error::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        Self {
            status,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

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

// ============ POST /api/analyze ============

/// Request body for `POST /api/analyze`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    owner_id: String,
    name: String,
    /// Filename → base64-encoded content.
    files: HashMap<String, String>,
}

async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Request-scoped token; transport-level timeouts belong to the caller.
    let cancel = CancellationToken::new();

    let result = run_analysis(
        state.store.as_ref(),
        state.store.as_ref(),
        &req.owner_id,
        &req.name,
        &req.files,
        state.config.analysis.min_percentage,
        &cancel,
    )
    .await?;

    Ok(Json(serde_json::json!({ "result": result })))
}

// ============ GET /api/submissions ============

#[derive(Serialize)]
struct SubmissionsResponse {
    submissions: Vec<SubmissionSummary>,
}

async fn handle_list_submissions(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let submissions = state
        .store
        .list_submissions()
        .await
        .map_err(|e| internal(e.to_string()))?;

    Ok(Json(
        serde_json::json!({ "result": SubmissionsResponse { submissions } }),
    ))
}
