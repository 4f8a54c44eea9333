//! HTTP error mapping
//!
//! Every handler returns [`ApiResult`]; failures render as
//! `{"error": {"code", "message"}}`, with a `fields` map for validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gigdir_common::validation::ValidationErrors;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected submission (400)
    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationErrors),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Persistence or other server-side failure (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<gigdir_common::Error> for ApiError {
    fn from(err: gigdir_common::Error) -> Self {
        match err {
            gigdir_common::Error::Validation(errors) => ApiError::Validation(errors),
            gigdir_common::Error::NotFound(what) => ApiError::NotFound(what),
            other if other.is_persistence_failure() => {
                ApiError::Internal(format!("persistence failure, transaction rolled back: {other}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                warn!("Rejected submission: {}", errors.summary());
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION",
                        "message": errors.summary(),
                        "fields": errors,
                    }
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(what) => {
                let body = Json(json!({
                    "error": {
                        "code": "NOT_FOUND",
                        "message": format!("Resource not found: {what}"),
                    }
                }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                let body = Json(json!({
                    "error": {
                        "code": "INTERNAL_ERROR",
                        "message": "An error occurred. The request could not be completed.",
                    }
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use gigdir_common::validation::FieldError;

    #[test]
    fn test_common_errors_map_by_kind() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", "Phone", FieldError::invalid_format("Invalid phone number."));
        assert!(matches!(
            ApiError::from(gigdir_common::Error::Validation(errors)),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(gigdir_common::Error::NotFound("venue 9".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(gigdir_common::Error::Internal("boom".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name", FieldError::missing());
        assert_eq!(
            ApiError::Validation(errors).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("show 1".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("disk I/O error".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
