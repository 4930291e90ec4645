use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::auth::FieldError;
use crate::db::StoreError;
use crate::domain::DomainError;

/// Body returned for every 500; details only go to the logs
pub const GENERIC_FAILURE: &str = "Something went wrong!";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Validation(Vec<FieldError>),
    Internal(String),
    Database(String),
    /// A storage failure with the message the client should see
    Storage { message: &'static str, detail: String },
}

impl ApiError {
    pub fn storage(message: &'static str, err: StoreError) -> Self {
        ApiError::Storage {
            message,
            detail: err.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Validation(errors) => write!(f, "Validation error: {} field(s) invalid", errors.len()),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Database(msg) => write!(f, "Database error: {}", msg),
            ApiError::Storage { message, detail } => write!(f, "{}: {}", message, detail),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            ApiError::Internal(_) | ApiError::Database(_) | ApiError::Storage { .. }
        ) {
            tracing::error!(error = %self, "Request failed");
        }

        let (status, error_type, message, errors) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                GENERIC_FAILURE.to_string(),
                None,
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                GENERIC_FAILURE.to_string(),
                None,
            ),
            ApiError::Storage { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                message.to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_type,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Overflow => ApiError::Internal(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_database_errors_do_not_leak() {
        let response = ApiError::Database("relation \"users\" does not exist".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], GENERIC_FAILURE);
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn test_storage_error_uses_context_message() {
        let err = ApiError::storage("Error saving carbon entry", StoreError::ConnectionError("timeout".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Error saving carbon entry");
    }

    #[tokio::test]
    async fn test_validation_lists_field_errors() {
        let err = ApiError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "Invalid email address".to_string(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "email");
    }

    #[test]
    fn test_conversions() {
        assert!(matches!(
            ApiError::from(StoreError::Conflict("dup".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::MissingOption { category: Category::Food }),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(ApiError::from(DomainError::Overflow), ApiError::Internal(_)));
    }
}
