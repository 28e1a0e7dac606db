use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::value_objects::rate_limit::RateLimitExceeded;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<ValidationIssue>),

    #[error("Too many requests")]
    TooManyRequests { retry_after_seconds: Option<i64> },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "ok": false, "error": "Unauthorized" }),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "ok": false, "error": "Forbidden" }),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": message }),
            ),
            AppError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": "Validation failed", "issues": issues }),
            ),
            AppError::TooManyRequests {
                retry_after_seconds,
            } => {
                let mut body = json!({ "ok": false, "error": "Too many requests" });
                if let Some(seconds) = retry_after_seconds {
                    body["retry_after_seconds"] = json!(seconds);
                }
                (StatusCode::TOO_MANY_REQUESTS, body)
            }
            // Internal details stay in the logs, not in the response.
            AppError::Internal(err) => {
                tracing::error!(error = %err, "http: internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "ok": false, "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps usecase errors onto the response envelope by their message, the
/// same strings the usecases return.
pub fn from_usecase_error(err: anyhow::Error) -> AppError {
    if let Some(limited) = err.downcast_ref::<RateLimitExceeded>() {
        return AppError::TooManyRequests {
            retry_after_seconds: Some(limited.retry_after_seconds),
        };
    }

    let message = err.to_string();
    if message.contains("Forbidden") {
        AppError::Forbidden
    } else if message.contains("Chat limit reached") {
        AppError::TooManyRequests {
            retry_after_seconds: None,
        }
    } else if message.contains("not found")
        || message.contains("required")
        || message.contains("too long")
        || message.contains("Too many")
        || message.contains("yourself")
        || message.contains("out of range")
        || message.contains("Unknown plan")
        || message.contains("No grants")
    {
        AppError::BadRequest(message)
    } else {
        AppError::Internal(err)
    }
}
