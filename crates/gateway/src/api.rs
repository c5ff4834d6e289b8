//! Route handlers and wire types.

use crate::{SOURCE_HEADER, SharedState};
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use parlance_core::{CurriculumRequest, Error, Language, Scenario, ValidationError};
use parlance_curriculum::Availability;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/available-scenarios", get(available_scenarios_handler))
        .route("/cache-stats", get(cache_stats_handler))
        .route("/generate-curriculum", post(generate_curriculum_handler))
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub generation_available: bool,
    pub cache_entry_count: usize,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStatsResponse {
    pub size: usize,
    pub keys: Vec<(Language, Scenario)>,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a pipeline error to an HTTP status.
fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::UnsupportedScenario { .. } => StatusCode::BAD_GATEWAY,
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        message: "Language Learning Curriculum API is running".into(),
        generation_available: state.pipeline.generation_available(),
        cache_entry_count: state.pipeline.cache().len(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn available_scenarios_handler(State(state): State<SharedState>) -> Json<Availability> {
    Json(state.pipeline.available())
}

async fn cache_stats_handler(State(state): State<SharedState>) -> Json<CacheStatsResponse> {
    let stats = state.pipeline.cache_stats();
    Json(CacheStatsResponse {
        size: stats.size,
        keys: stats.keys,
        hits: stats.hits,
        misses: stats.misses,
        hit_rate: stats.hit_rate,
    })
}

async fn generate_curriculum_handler(
    State(state): State<SharedState>,
    payload: Result<Json<CurriculumRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        let err = ValidationError::MalformedBody(rejection.body_text());
        warn!(error = %err, "Rejected curriculum request");
        api_error(status, err.to_string())
    })?;

    info!(
        target_language = %request.target_language,
        scenario = %request.scenario,
        "Curriculum requested"
    );

    match state.pipeline.generate(&request).await {
        Ok(outcome) => Ok((
            [(SOURCE_HEADER, outcome.source.as_str())],
            Json(outcome.response),
        )
            .into_response()),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                error!(error = %e, "Curriculum generation failed");
            } else {
                warn!(error = %e, "Invalid curriculum request");
            }
            Err(api_error(status, e.to_string()))
        }
    }
}
