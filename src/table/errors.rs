//! # Table Errors
//!
//! Error types for loading, querying, mutating and persisting the table.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use super::row::RowId;
use crate::observability::Event;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Table errors
#[derive(Debug, Clone, Error)]
pub enum TableError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Row identifier is negative or was never assigned
    #[error("Invalid index: {0}")]
    InvalidIndex(i64),

    /// Row identifier was assigned but the row has been deleted
    #[error("Row not found: {0}")]
    RowNotFound(RowId),

    /// Request body could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // ==================
    // Load Errors
    // ==================
    /// Source file could not be opened or parsed
    #[error("Failed to read {path}: {reason}")]
    Load { path: String, reason: String },

    /// Worksheet not present in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A required column is missing from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two header cells share a name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Header uses a name reserved for the row identifier
    #[error("Column name '{0}' is reserved")]
    ReservedColumn(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Output file could not be written
    #[error("Failed to write {path}: {reason}")]
    Persist { path: String, reason: String },

    /// Internal failure (poisoned lock, cancelled task)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TableError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            TableError::InvalidIndex(_) => StatusCode::BAD_REQUEST,
            TableError::InvalidBody(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            TableError::RowNotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            TableError::Load { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::SheetNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::MissingColumn(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::DuplicateColumn(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::ReservedColumn(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::Persist { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        TableError::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persist(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        TableError::Persist {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<TableError> for ErrorResponse {
    fn from(err: TableError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for TableError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(event = %Event::RequestFailed, code = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(event = %Event::RequestFailed, code = status.as_u16(), error = %self, "request rejected");
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
