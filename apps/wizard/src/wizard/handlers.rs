use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assembly::{assemble, dispatch, ARTIFACT_CONTENT_TYPE};
use crate::clients::StoredResume;
use crate::errors::AppError;
use crate::preview::{preview_sections, PreviewSection};
use crate::state::AppState;
use crate::templates::{template_label, Template, TEMPLATES};
use crate::wizard::forms::{EducationForm, ExperienceForm, PersonalForm, SummaryForm};
use crate::wizard::state::{Step, WizardSnapshot};

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// POST /api/v1/wizard
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let session_id = state.sessions.create().await;
    Ok(Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/wizard/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(state.sessions.snapshot(id).await?))
}

/// POST /api/v1/wizard/:id/personal
pub async fn handle_submit_personal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<PersonalForm>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.submit_personal(form)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/summary
pub async fn handle_submit_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<SummaryForm>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.submit_summary(form)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ExperienceForm>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.add_experience(form)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/wizard/:id/experiences/:index
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.remove_experience(index)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<EducationForm>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.add_education(form)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/wizard/:id/education/:index
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.remove_education(index)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/advance
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.advance()?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.back();
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.reset();
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

#[derive(Deserialize)]
pub struct TemplateSelection {
    pub template_id: String,
}

/// POST /api/v1/wizard/:id/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(selection): Json<TemplateSelection>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with(id, |wizard| {
            wizard.select_template(&selection.template_id)?;
            Ok(wizard.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub sections: Vec<PreviewSection>,
}

/// GET /api/v1/wizard/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    let wizard = state.sessions.get(id).await?;
    let document = assemble(&wizard)?;
    Ok(Json(PreviewResponse {
        sections: preview_sections(&document),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Present when a signed-in user wants the resume persisted; generation
    /// and download work without it.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// POST /api/v1/wizard/:id/generate
///
/// Terminal wizard action: assembles the canonical document, obtains the
/// binary artifact from the generation collaborator, and streams it back as
/// a download. Persistence runs as a detached best-effort task; its failure
/// never affects this response.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Response, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let (document, template_id) = state
        .sessions
        .with(id, |wizard| {
            if wizard.current_step() != Step::Template {
                return Err(crate::wizard::WizardError::StepMismatch {
                    expected: Step::Template.name(),
                });
            }
            let document = assemble(wizard)?;
            Ok((document, wizard.template_id().to_string()))
        })
        .await?;

    let outcome = dispatch(
        document,
        &template_id,
        request.user_id,
        &state.generator,
        &state.store,
    )
    .await?;

    state
        .sessions
        .with(id, |wizard| {
            wizard.mark_done();
            Ok(())
        })
        .await?;

    // fire-and-forget: the persistence handle is intentionally not awaited
    drop(outcome.persistence);

    let headers = [
        (header::CONTENT_TYPE, ARTIFACT_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", outcome.artifact.filename),
        ),
    ];
    Ok((headers, outcome.artifact.content).into_response())
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<&'static [Template]> {
    Json(TEMPLATES)
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ResumeListItem {
    #[serde(flatten)]
    pub resume: StoredResume,
    /// Display label for the template; unknown ids fall back to the raw id.
    pub template_label: String,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeListItem>,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = state
        .store
        .list_resumes(params.user_id)
        .await?
        .into_iter()
        .map(|resume| ResumeListItem {
            template_label: template_label(&resume.template_id).to_string(),
            resume,
        })
        .collect();
    Ok(Json(ResumeListResponse { resumes }))
}
