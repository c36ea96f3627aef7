//! Error responses
//!
//! Every failure renders as `{ "error": { "code", "message" } }`. Validation
//! failures additionally carry `"errors": [{ "path", "message" }]`.
//!
//! An orchestration failure takes the status of the step error it wraps; only
//! server-side causes report `ORCHESTRATION_FAILED`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::{Error, ValidationErrors};

/// Result type for API handlers
pub type ApiResult<T> = Result<T, Error>;

impl Error {
    /// HTTP status and machine-readable code
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Error::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            Error::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Error::Database(sqlx::Error::RowNotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                (StatusCode::CONFLICT, "CONFLICT")
            }
            Error::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                (StatusCode::BAD_REQUEST, "INVALID_REFERENCE")
            }
            Error::Orchestration { source, .. } => match source.status() {
                (status, _) if status.is_server_error() => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "ORCHESTRATION_FAILED")
                }
                client => client,
            },
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            Error::Config(_) | Error::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    /// Field errors, looking through orchestration wrappers
    fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            Error::Orchestration { source, .. } => source.field_errors(),
            _ => None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = match self.field_errors() {
            Some(errors) => json!({
                "error": {
                    "code": code,
                    "message": "One or more fields are invalid",
                },
                "errors": errors.errors,
            }),
            None => json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_renders_field_errors() {
        let err = Error::Validation(ValidationErrors::single("dueDate", "Due date must be on or after open date"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["errors"][0]["path"], "dueDate");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(Error::not_found("issue", "x").status().0, StatusCode::NOT_FOUND);
        assert_eq!(Error::Forbidden("no".into()).status().0, StatusCode::FORBIDDEN);
        assert_eq!(Error::InvalidInput("bad".into()).status().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::orchestration("insert header", Error::Internal("x".into())).status(),
            (StatusCode::INTERNAL_SERVER_ERROR, "ORCHESTRATION_FAILED")
        );
    }

    #[tokio::test]
    async fn test_orchestration_keeps_client_status() {
        let wrapped = Error::orchestration("read supplier", Error::not_found("supplier", "s9"));
        assert_eq!(wrapped.status(), (StatusCode::NOT_FOUND, "NOT_FOUND"));

        let wrapped = Error::orchestration(
            "insert issue items",
            Error::Validation(ValidationErrors::single("items", "Item ID is unknown")),
        );
        let response = wrapped.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["errors"][0]["path"], "items");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let json = body_json(Error::Forbidden("quality_delete permission required".into()).into_response()).await;
        assert_eq!(json["error"]["code"], "FORBIDDEN");
        assert_eq!(
            json["error"]["message"],
            "Forbidden: quality_delete permission required"
        );
    }
}
