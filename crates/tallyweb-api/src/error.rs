//! Error types for tallyweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() }).to_string();
        (self.status(), body).into_response()
    }
}

impl From<tallyweb_core::CoreError> for ApiError {
    fn from(error: tallyweb_core::CoreError) -> Self {
        use tallyweb_core::CoreError;
        match error {
            CoreError::TransactionNotFound { id } => ApiError::NotFound { resource: id },
            CoreError::FileNotFound { path } => ApiError::NotFound { resource: path },
            CoreError::NotLoaded => ApiError::BadRequest {
                message: "No snapshot loaded".to_string(),
            },
            CoreError::SnapshotError { message } | CoreError::ValidationError { message } => {
                ApiError::BadRequest { message }
            }
            _ => ApiError::InternalError,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let error = ApiError::NotFound {
            resource: "s-1".to_string(),
        };
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InternalError.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_error_conversion() {
        let error: ApiError = tallyweb_core::CoreError::NotLoaded.into();
        assert!(matches!(error, ApiError::BadRequest { .. }));
    }
}
