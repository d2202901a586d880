//! Route definitions.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::docs;
use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `state` - Shared handler state (solver settings)
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Bond analytics
        .route("/api/v1/bond/calculate", post(handlers::calculate_bond))
        .with_state(state)
        // OpenAPI / Swagger UI
        .merge(docs::swagger_ui())
}
