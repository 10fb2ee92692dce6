use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;
use crate::upload::flow::run_upload;
use crate::wizard::state::WizardSnapshot;

#[derive(Serialize)]
pub struct UploadResponse {
    pub data: ResumeDocument,
    pub snapshot: WizardSnapshot,
}

/// POST /api/v1/wizard/:id/upload
///
/// Multipart upload with a single `file` field. On success the extracted
/// canonical document is installed on the session, which rejoins the manual
/// flow at the review/template step.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::UnsupportedFile(format!("Malformed upload: {err}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("resume").to_string();
            let content = field
                .bytes()
                .await
                .map_err(|err| AppError::UnsupportedFile(format!("Malformed upload: {err}")))?;
            file = Some((filename, content));
        }
    }

    let (filename, content) =
        file.ok_or_else(|| AppError::UnsupportedFile("Missing 'file' field".to_string()))?;

    let data = run_upload(&state.sessions, id, &filename, content, &state.extractor).await?;
    let snapshot = state.sessions.snapshot(id).await?;

    Ok(Json(UploadResponse { data, snapshot }))
}
