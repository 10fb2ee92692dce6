use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::clients::CollaboratorError;
use crate::wizard::validate::ValidationErrors;
use crate::wizard::WizardError;

/// Generic user-facing message for collaborator failures that did not carry
/// their own error payload.
pub const COLLABORATOR_FALLBACK_MESSAGE: &str =
    "The resume service is unavailable right now. Try again in a few minutes.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Upload already in progress")]
    UploadInFlight,

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Invalid(errors) => AppError::Validation(errors),
            WizardError::NoSuchEntry(index) => {
                AppError::NotFound(format!("No entry at index {index}"))
            }
            WizardError::UploadInFlight => AppError::UploadInFlight,
            other => AppError::UnprocessableEntity(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "One or more fields are invalid".to_string(),
                Some(serde_json::to_value(errors).unwrap_or_default()),
            ),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
                None,
            ),
            AppError::UploadInFlight => (
                StatusCode::CONFLICT,
                "UPLOAD_IN_FLIGHT",
                "Another upload is already in progress for this session".to_string(),
                None,
            ),
            AppError::UnsupportedFile(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNSUPPORTED_FILE",
                msg.clone(),
                None,
            ),
            AppError::Collaborator(err) => {
                tracing::error!("Collaborator error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "COLLABORATOR_ERROR",
                    err.user_message()
                        .unwrap_or(COLLABORATOR_FALLBACK_MESSAGE)
                        .to_string(),
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fields) = fields {
            error["fields"] = fields;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
