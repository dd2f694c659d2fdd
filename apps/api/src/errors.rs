use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GenerationError;
use crate::store::StoreError;
use crate::workflow::interpreter::ParseError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Store access error: {0}")]
    StoreAccess(#[from] StoreError),

    #[error("Sheet '{0}' has no registered rows")]
    EmptyStore(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::MalformedResponse {
            reason: e.to_string(),
            raw: e.raw().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::ConfigurationMissing(msg) => {
                tracing::error!("Configuration missing: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_MISSING",
                    msg.clone(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::StoreAccess(e) => {
                tracing::error!("Store access error: {e}");
                let status = match e {
                    StoreError::NotFoundOrUnshared(_) | StoreError::SheetNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, "STORE_ACCESS_ERROR", e.to_string())
            }
            AppError::EmptyStore(sheet) => (
                StatusCode::CONFLICT,
                "EMPTY_STORE",
                format!("No candidates are registered in '{sheet}' yet"),
            ),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    format!("The model call failed: {e}"),
                )
            }
            AppError::MalformedResponse { reason, .. } => {
                tracing::warn!("Malformed model response: {reason}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MALFORMED_RESPONSE",
                    format!("The model answer could not be used: {reason}"),
                )
            }
            AppError::Persistence(msg) => {
                tracing::error!("Persistence error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PERSISTENCE_ERROR",
                    format!("The row could not be saved: {msg}"),
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

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::MalformedResponse { raw, .. } = &self {
            error["raw"] = json!(raw);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
