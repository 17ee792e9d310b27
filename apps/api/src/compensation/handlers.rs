//! Axum route handlers for the Salary API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::compensation::models::EnhancedSalaryAnalysis;
use crate::errors::AppError;
use crate::location::{JobLocationContext, UserLocationProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeSalaryRequest {
    pub salary: String,
    pub job: JobLocationContext,
    #[serde(default)]
    pub profile: Option<UserLocationProfile>,
}

/// POST /api/v1/salary/analyze
pub async fn handle_analyze_salary(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeSalaryRequest>,
) -> Result<Json<EnhancedSalaryAnalysis>, AppError> {
    if req.salary.trim().is_empty() {
        return Err(AppError::Validation("salary must not be empty".to_string()));
    }

    state
        .calculator
        .calculate_for_job(&req.salary, &req.job, req.profile.as_ref())
        .await
        .map(Json)
        .ok_or_else(|| {
            AppError::UnprocessableEntity(format!(
                "Not enough data to analyze '{}' for '{}'",
                req.salary, req.job.location
            ))
        })
}
