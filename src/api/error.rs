//! HTTP mapping of service errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::domain::DomainError;
use crate::services::account_service::LoginError;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Validation { .. } | DomainError::Conflict { .. } => StatusCode::BAD_REQUEST,
            DomainError::External(_) => StatusCode::BAD_GATEWAY,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Field errors keep the `{field: message}` shape clients already parse
    fn body(&self) -> Value {
        match self {
            DomainError::NotFound => json!({ "error": "Not found" }),
            DomainError::Validation { field, message }
            | DomainError::Conflict { field, message } => json!({ field.as_str(): message }),
            DomainError::External(_) => json!({ "error": "Book catalog unavailable" }),
            DomainError::Database(_) | DomainError::Internal(_) => {
                json!({ "error": "Internal server error" })
            }
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else if status == StatusCode::BAD_GATEWAY {
            tracing::warn!("Upstream failure: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::UnknownEmail => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": self.to_string() })),
            )
                .into_response(),
            LoginError::InvalidPassword => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": self.to_string() })),
            )
                .into_response(),
            LoginError::Domain(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_use_the_field_as_key() {
        let err = DomainError::validation("rating", "Ensure this value is between 1 and 5.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            json!({ "rating": "Ensure this value is between 1 and 5." })
        );
    }

    #[test]
    fn conflicts_are_bad_requests() {
        let err = DomainError::conflict("username", "Username already exists");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), json!({ "username": "Username already exists" }));
    }

    #[test]
    fn internals_are_not_leaked() {
        let err = DomainError::Database("no such table: users".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body(), json!({ "error": "Internal server error" }));
    }

    #[test]
    fn upstream_failure_is_bad_gateway() {
        assert_eq!(
            DomainError::External("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
