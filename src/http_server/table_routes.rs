//! Table HTTP Routes
//!
//! Category listing, per-category rows, single-row lookup, and the two
//! mutating endpoints. Every handler that takes the table lock runs on the
//! blocking pool: mutations hold the write lock while the output file is
//! rewritten, and readers queue behind them.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::table::{RowId, RowRecord, TableError, TableResult, TableService};

pub const UPDATED_MESSAGE: &str = "Data updated successfully";
pub const DELETED_MESSAGE: &str = "Data deleted successfully";

// ==================
// Shared State
// ==================

/// Table state shared across handlers
#[derive(Debug)]
pub struct TableState {
    pub service: TableService,
}

impl TableState {
    pub fn new(service: TableService) -> Self {
        Self { service }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct UpdateRowRequest {
    #[serde(alias = "id")]
    pub index: i64,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRowRequest {
    #[serde(alias = "id")]
    pub index: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ==================
// Table Routes
// ==================

/// Create table routes
pub fn table_routes(state: Arc<TableState>) -> Router {
    Router::new()
        .route("/categories", get(list_categories_handler))
        .route("/data/{category}", get(category_rows_handler))
        .route("/rows/{id}", get(get_row_handler))
        .route("/update", post(update_row_handler))
        .route("/delete", post(delete_row_handler))
        .with_state(state)
}

/// Run a blocking table call off the async workers
pub(crate) async fn run_blocking<T, F>(f: F) -> TableResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> TableResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TableError::Internal(e.to_string()))?
}

// ==================
// Handlers
// ==================

async fn list_categories_handler(
    State(state): State<Arc<TableState>>,
) -> TableResult<Json<Vec<String>>> {
    let categories = run_blocking(move || state.service.list_distinct_categories()).await?;
    Ok(Json(categories))
}

async fn category_rows_handler(
    State(state): State<Arc<TableState>>,
    Path(category): Path<String>,
) -> TableResult<Json<Vec<RowRecord>>> {
    let rows = run_blocking(move || state.service.get_rows_by_category(&category)).await?;
    Ok(Json(rows))
}

async fn get_row_handler(
    State(state): State<Arc<TableState>>,
    id: Result<Path<i64>, PathRejection>,
) -> TableResult<Json<RowRecord>> {
    let Path(index) = id.map_err(|e| TableError::InvalidBody(e.body_text()))?;
    let id = RowId::from_index(index)?;
    let record = run_blocking(move || state.service.get_row(id)).await?;
    Ok(Json(record))
}

async fn update_row_handler(
    State(state): State<Arc<TableState>>,
    payload: Result<Json<UpdateRowRequest>, JsonRejection>,
) -> TableResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|e| TableError::InvalidBody(e.body_text()))?;
    let id = RowId::from_index(request.index)?;

    run_blocking(move || {
        state
            .service
            .update_row(id, &request.description, request.price)
    })
    .await?;

    Ok(Json(MessageResponse::new(UPDATED_MESSAGE)))
}

async fn delete_row_handler(
    State(state): State<Arc<TableState>>,
    payload: Result<Json<DeleteRowRequest>, JsonRejection>,
) -> TableResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|e| TableError::InvalidBody(e.body_text()))?;
    let id = RowId::from_index(request.index)?;

    run_blocking(move || state.service.delete_row(id)).await?;

    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}
