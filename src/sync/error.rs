//! Sync Error Types
//!
//! Errors of the document sync endpoints and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Sync server error types
#[derive(Error, Debug)]
pub enum SyncError {
    /// Neither a synced nor an initial document exists
    #[error("No document at {0:?}")]
    DocumentMissing(PathBuf),

    /// Upload directory exists but is not a directory
    #[error("{0:?} is not a directory")]
    InvalidUploadDir(PathBuf),

    /// Certificates missing or unusable
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            SyncError::DocumentMissing(_) => (StatusCode::NOT_FOUND, "DOCUMENT_MISSING"),
            SyncError::InvalidUploadDir(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_UPLOAD_DIR")
            }
            SyncError::Tls(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TLS_ERROR"),
            SyncError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            SyncError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Sync error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = SyncError::DocumentMissing(PathBuf::from("initial/index.html")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let response = SyncError::from(io).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
