use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

pub const ACCESS_DENIED_MESSAGE: &str = "Resume not found or access denied";

/// Application-level error type for everything outside the upload pipeline.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn access_denied() -> Self {
        AppError::AccessDenied(ACCESS_DENIED_MESSAGE.to_string())
    }
}

/// Client-side extractor rejections become validation errors; anything else
/// is a server fault.
fn from_rejection(status: StatusCode, body_text: String) -> AppError {
    if status.is_client_error() {
        AppError::Validation(body_text)
    } else {
        AppError::Internal(anyhow::anyhow!(body_text))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        from_rejection(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UploadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "UPLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Please sign in to continue.".to_string(),
            ),
            AppError::AccessDenied(msg) => (StatusCode::FORBIDDEN, "ACCESS_DENIED", msg.clone()),
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": true,
            "code": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_access_denied_body() {
        let (status, body) = body_of(AppError::access_denied()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "ACCESS_DENIED");
        assert_eq!(body["message"], ACCESS_DENIED_MESSAGE);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let (status, body) = body_of(AppError::Internal(anyhow::anyhow!("pool exhausted"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["message"].as_str().unwrap().contains("pool"));
    }

    #[test]
    fn test_rejection_status_selects_variant() {
        let client = from_rejection(StatusCode::BAD_REQUEST, "bad limit".to_string());
        assert!(matches!(client, AppError::Validation(m) if m == "bad limit"));
        let server = from_rejection(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert!(matches!(server, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_unauthenticated_status() {
        let (status, body) = body_of(AppError::Unauthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }
}
