//! HTTP handlers

use super::models::*;
use crate::engine::{CheckResult, Orchestrator};
use crate::metrics::METRICS;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Shortest accepted claim after trimming
    pub min_claim_chars: usize,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(error_codes::VALIDATION_ERROR, message)),
    )
}

/// Trim and length-check user text before it reaches the engine
///
/// `label` names the field in error messages ("Claim", "Message").
pub fn validate_claim(label: &str, raw: &str, min_chars: usize) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", label));
    }
    if trimmed.chars().count() < min_chars {
        return Err(format!(
            "{} too short. Please provide at least {} characters.",
            label, min_chars
        ));
    }
    Ok(trimmed.to_string())
}

async fn run_check(state: &AppState, claim: &str) -> Result<CheckResult, (StatusCode, Json<ApiError>)> {
    state.orchestrator.check(claim).await.map_err(|e| {
        error!("Claim check failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(error_codes::INTERNAL_ERROR, e.to_string())),
        )
    })
}

/// Verify a claim and return the full check result
///
/// POST /api/verify
pub async fn verify_claim(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> ApiResult<CheckResult> {
    let raw = match payload {
        Ok(Json(VerifyRequest { claim: Some(claim) })) => claim,
        Ok(_) => return Err(bad_request("Missing claim in request body")),
        Err(rejection) => {
            warn!("Rejected verify body: {}", rejection);
            return Err(bad_request("Missing claim in request body"));
        }
    };

    let claim = validate_claim("Claim", &raw, state.min_claim_chars).map_err(bad_request)?;
    info!("Verify request: {}", claim);

    Ok(Json(run_check(&state, &claim).await?))
}

/// Verify a claim and return the simplified shape
///
/// POST /submit
pub async fn submit_claim(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<SubmitResponse> {
    let raw = match payload {
        Ok(Json(SubmitRequest { message: Some(message) })) => message,
        Ok(_) => return Err(bad_request("Missing \"message\" field in request body")),
        Err(rejection) => {
            warn!("Rejected submit body: {}", rejection);
            return Err(bad_request("No JSON data received"));
        }
    };

    let message = validate_claim("Message", &raw, state.min_claim_chars).map_err(bad_request)?;
    info!("Submit request: {}", message);

    let result = run_check(&state, &message).await?;
    Ok(Json(SubmitResponse::from(&result)))
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// List registered evidence providers
///
/// GET /api/sources
pub async fn list_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    Json(SourcesResponse {
        sources: state.orchestrator.registry().descriptors(),
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
