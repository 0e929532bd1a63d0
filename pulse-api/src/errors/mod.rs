//! Handler error type with HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use pulse_repository::SearchIndexError;

/// Errors produced by the HTTP handlers.
///
/// Every variant maps to one HTTP status: invalid parameters are 400,
/// missing documents are 404, and search backend failures are 502.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A query or path parameter failed validation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The search backend failed or was unreachable.
    #[error("Search error: {0}")]
    SearchError(String),
}

impl ApiError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }
}

impl From<SearchIndexError> for ApiError {
    fn from(e: SearchIndexError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::SearchError(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidParameter(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::SearchError(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err: ApiError = SearchIndexError::document_not_found("42").into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_backend_error_mapping() {
        let err: ApiError = SearchIndexError::search("boom").into();
        assert!(matches!(err, ApiError::SearchError(_)));
    }
}
