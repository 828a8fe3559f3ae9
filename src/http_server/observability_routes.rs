//! Observability HTTP Routes
//!
//! Health check reporting the server version and the current row count.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::table_routes::{run_blocking, TableState};
use crate::table::TableError;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rows: usize,
}

/// Health check route
pub fn health_routes(state: Arc<TableState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(
    State(state): State<Arc<TableState>>,
) -> Result<impl IntoResponse, TableError> {
    let rows = run_blocking(move || state.service.len()).await?;
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rows,
    };

    Ok((StatusCode::OK, Json(response)))
}
