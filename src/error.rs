// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every failure is rendered as `{success: false, message, error}` so the bot
//! platform and the mobile client can branch on a single flag.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("No URL found in message text")]
    NoUrlFound,

    #[error("User not found")]
    UserNotFound { phone_no: String },

    #[error("URL platform not supported. Only YouTube and Instagram are supported.")]
    UnsupportedPlatform { url: String },

    #[error("Extraction provider error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NoUrlFound => "no_url_found",
            AppError::UserNotFound { .. } => "user_not_found",
            AppError::UnsupportedPlatform { .. } => "unsupported_platform",
            AppError::Upstream(_) => "upstream_error",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NoUrlFound => StatusCode::BAD_REQUEST,
            AppError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::UnsupportedPlatform { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage and internal details stay in the logs.
        let message = match &self {
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                "Storage unavailable".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Extraction provider error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let phone_no = match &self {
            AppError::UserNotFound { phone_no } => Some(phone_no.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            message,
            error: self.code().to_string(),
            phone_no,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_user_not_found_carries_phone_no() {
        let (status, json) = body_json(AppError::UserNotFound {
            phone_no: "+1234567890".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "User not found");
        assert_eq!(json["phone_no"], "+1234567890");
    }

    #[tokio::test]
    async fn test_storage_details_are_not_leaked() {
        let (status, json) =
            body_json(AppError::Storage("grpc: deadline exceeded".to_string())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "storage_error");
        assert!(!json["message"].as_str().unwrap().contains("grpc"));
        assert!(json.get("phone_no").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NoUrlFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::UnsupportedPlatform { url: "x".into() }.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Upstream("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
