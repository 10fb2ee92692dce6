//! Collaborator clients — the single point of entry for every external HTTP
//! dependency of the wizard.
//!
//! ARCHITECTURAL RULE: no other module may talk to the extraction,
//! generation, or storage services directly. All outbound calls go through
//! the traits below, so handlers stay testable with in-process fakes.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::ResumeDocument;

pub mod extraction;
pub mod generation;
pub mod storage;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator answered with its own error payload. The message is
    /// authored by the collaborator and safe to surface to the user.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from collaborator (status {status})")]
    Unexpected { status: u16 },

    #[error("collaborator reported failure without details")]
    Failed,
}

impl CollaboratorError {
    /// Collaborator-authored message, if any. Everything else falls back to
    /// a generic user-facing message at the error boundary.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            CollaboratorError::Service { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Error payloads come in two shapes: FastAPI-style `{"detail": ...}` from
/// the builder API and PostgREST-style `{"message": ...}` from storage.
pub(crate) async fn error_from_response(response: reqwest::Response) -> CollaboratorError {
    let status = response.status().as_u16();

    #[derive(Deserialize)]
    struct ErrorBody {
        detail: Option<String>,
        message: Option<String>,
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => match body.detail.or(body.message) {
            Some(message) => CollaboratorError::Service { status, message },
            None => CollaboratorError::Unexpected { status },
        },
        Err(_) => CollaboratorError::Unexpected { status },
    }
}

/// Raw text pulled out of an uploaded resume file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub text: String,
    pub filename: String,
}

/// Text extraction + AI structured extraction, performed by the builder API.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn parse_file(
        &self,
        filename: &str,
        content: Bytes,
    ) -> Result<ParsedFile, CollaboratorError>;

    async fn extract_data(&self, text: &str) -> Result<ResumeDocument, CollaboratorError>;
}

/// DOCX generation, performed by the builder API.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        template_id: &str,
        resume: &ResumeDocument,
    ) -> Result<Bytes, CollaboratorError>;
}

/// Best-effort persistence of generated resumes.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert_resume(&self, record: &NewResumeRecord) -> Result<(), CollaboratorError>;

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<StoredResume>, CollaboratorError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct NewResumeRecord {
    pub user_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub data: ResumeDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResume {
    pub id: Uuid,
    pub title: String,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
}
