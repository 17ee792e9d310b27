pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::compensation::handlers as salary;
use crate::errors::AppError;
use crate::location::handlers as location;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Location API
        .route(
            "/api/v1/location/resolve",
            post(location::handle_resolve_location),
        )
        .route(
            "/api/v1/location/alternatives",
            post(location::handle_location_alternatives),
        )
        // Salary API
        .route("/api/v1/salary/analyze", post(salary::handle_analyze_salary))
        .fallback(not_found)
        .with_state(state)
}
