//! Axum route handlers for the Location API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::location::models::{JobLocationContext, LocationResolution, UserLocationProfile};
use crate::state::AppState;

const MAX_LOCATION_LEN: usize = 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveLocationRequest {
    pub job: JobLocationContext,
    #[serde(default)]
    pub profile: Option<UserLocationProfile>,
    /// Run `validate_location` on the result. Defaults to true.
    #[serde(default = "default_true")]
    pub validate: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    pub job: JobLocationContext,
    #[serde(default)]
    pub profile: Option<UserLocationProfile>,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub alternatives: Vec<LocationResolution>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/location/resolve
pub async fn handle_resolve_location(
    State(state): State<AppState>,
    Json(req): Json<ResolveLocationRequest>,
) -> Result<Json<LocationResolution>, AppError> {
    if req.job.location.len() > MAX_LOCATION_LEN {
        return Err(AppError::Validation(format!(
            "location must be at most {MAX_LOCATION_LEN} bytes"
        )));
    }

    let resolution = state
        .resolver
        .resolve_location(&req.job, req.profile.as_ref());
    let resolution = if req.validate {
        state.resolver.validate_location(resolution)
    } else {
        resolution
    };

    info!(
        "Resolved location '{}' → {} (confidence {:.2}, {})",
        req.job.location,
        resolution.display_name(),
        resolution.confidence,
        resolution.stage
    );
    Ok(Json(resolution))
}

/// POST /api/v1/location/alternatives
pub async fn handle_location_alternatives(
    State(state): State<AppState>,
    Json(req): Json<AlternativesRequest>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let alternatives = state
        .resolver
        .get_location_alternatives(&req.job, req.profile.as_ref());
    Ok(Json(AlternativesResponse { alternatives }))
}
