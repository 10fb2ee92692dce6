//! Document assembly and dispatch.
//!
//! Folds accumulated wizard state into the canonical `ResumeDocument`,
//! obtains the binary artifact from the generation collaborator, and kicks
//! off best-effort persistence. The asymmetry is contractual: generation
//! failure is user-visible and blocks completion; persistence failure after
//! a successful generation is logged and never surfaced.

use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::{Generator, NewResumeRecord, ResumeStore};
use crate::errors::AppError;
use crate::models::resume::{
    split_csv, split_lines, Education, Experience, PersonalInfo, ResumeDocument, Skills,
};
use crate::wizard::forms::{EducationForm, ExperienceForm};
use crate::wizard::state::WizardState;
use crate::wizard::WizardError;

pub const ARTIFACT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const ARTIFACT_SUFFIX: &str = "_ATS.docx";

/// Builds the canonical document for a session. An extracted document (the
/// upload path) passes through as-is; otherwise the accumulated step
/// payloads are folded together and normalized in one place, so every
/// consumer downstream can assume the model invariants hold.
pub fn assemble(state: &WizardState) -> Result<ResumeDocument, WizardError> {
    if let Some(doc) = state.extracted() {
        return Ok(doc.clone());
    }

    let personal = state.personal().ok_or(WizardError::PersonalMissing)?;
    let summary = state.summary();

    let doc = ResumeDocument {
        personal_info: PersonalInfo {
            full_name: personal.full_name.clone(),
            headline: None,
            email: personal.email.clone(),
            phone: personal.phone.clone(),
            location: personal.location.clone(),
            linkedin: personal.linkedin.clone(),
            github: personal.github.clone(),
            portfolio: personal.portfolio.clone(),
        },
        summary: summary.map(|s| s.summary.clone()),
        experiences: state.experiences().iter().map(experience_from_form).collect(),
        extracurricular_experiences: Vec::new(),
        education: state.educations().iter().map(education_from_form).collect(),
        skills: Skills {
            technical: summary.map(|s| split_csv(&s.technical)).unwrap_or_default(),
            tools: Vec::new(),
            soft: summary.map(|s| split_csv(&s.soft)).unwrap_or_default(),
            categorized: None,
        },
        certifications: Vec::new(),
        projects: Vec::new(),
        languages: Vec::new(),
    };

    Ok(doc.normalized())
}

fn experience_from_form(form: &ExperienceForm) -> Experience {
    Experience {
        company: form.company.clone(),
        position: form.position.clone(),
        location: form.location.clone(),
        start_date: form.start_date.clone(),
        end_date: form.end_date.clone(),
        current: form.current,
        achievements: split_lines(&form.achievements),
    }
}

fn education_from_form(form: &EducationForm) -> Education {
    Education {
        institution: form.institution.clone(),
        degree: form.degree.clone(),
        location: None,
        start_date: form.start_date.clone(),
        end_date: Some(form.end_date.clone()),
    }
}

/// Deterministic artifact name: whitespace in the full name collapses to
/// underscores, fixed suffix appended.
pub fn artifact_filename(full_name: &str) -> String {
    let joined = full_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{joined}{ARTIFACT_SUFFIX}")
}

/// Title of the persisted record, e.g. `"Ana Silva — 05/08/2026"`.
pub fn record_title(full_name: &str, date: NaiveDate) -> String {
    format!("{} — {}", full_name, date.format("%d/%m/%Y"))
}

pub struct Artifact {
    pub filename: String,
    pub content: Bytes,
}

pub struct DispatchOutcome {
    pub artifact: Artifact,
    /// Handle of the best-effort persistence task, `None` when no user is
    /// attached to the request. Tests may await it; the request path must
    /// not — the download has already succeeded by the time it runs.
    pub persistence: Option<JoinHandle<()>>,
}

/// Generates the binary artifact, then spawns best-effort persistence.
///
/// The record handed to persistence is a clone of the exact document that
/// was generated; the two calls never run concurrently against different
/// versions of the document.
pub async fn dispatch(
    document: ResumeDocument,
    template_id: &str,
    user_id: Option<Uuid>,
    generator: &Arc<dyn Generator>,
    store: &Arc<dyn ResumeStore>,
) -> Result<DispatchOutcome, AppError> {
    let content = generator
        .generate(template_id, &document)
        .await
        .map_err(AppError::Collaborator)?;

    let filename = artifact_filename(&document.personal_info.full_name);
    info!("generated resume artifact {filename} ({} bytes)", content.len());

    let persistence = user_id.map(|user_id| {
        let store = Arc::clone(store);
        let record = NewResumeRecord {
            user_id,
            title: record_title(
                &document.personal_info.full_name,
                chrono::Utc::now().date_naive(),
            ),
            template_id: template_id.to_string(),
            data: document.clone(),
        };
        tokio::spawn(async move {
            if let Err(err) = store.insert_resume(&record).await {
                warn!("best-effort resume persistence failed: {err}");
            }
        })
    });

    Ok(DispatchOutcome {
        artifact: Artifact { filename, content },
        persistence,
    })
}

#[cfg(test)]
pub(crate) mod tests_support {
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::clients::{
        CollaboratorError, Generator, NewResumeRecord, ResumeStore, StoredResume,
    };
    use crate::models::resume::{
        Education, Experience, PersonalInfo, ResumeDocument, Skills,
    };

    pub fn sample_document() -> ResumeDocument {
        ResumeDocument {
            personal_info: PersonalInfo {
                full_name: "Ana Silva".to_string(),
                headline: None,
                email: "ana@example.com".to_string(),
                phone: "11 99999-0000".to_string(),
                location: "São Paulo, SP".to_string(),
                linkedin: Some("linkedin.com/in/anasilva".to_string()),
                github: None,
                portfolio: None,
            },
            summary: Some("Backend developer with four years building billing systems.".to_string()),
            experiences: vec![Experience {
                company: "Acme".to_string(),
                position: "Backend Developer".to_string(),
                location: Some("Remote".to_string()),
                start_date: "Jan 2022".to_string(),
                end_date: Some("Dec 2024".to_string()),
                current: false,
                achievements: vec!["Cut invoice processing time by 60%".to_string()],
            }],
            extracurricular_experiences: vec![],
            education: vec![Education {
                institution: "USP".to_string(),
                degree: "BSc Computer Science".to_string(),
                location: None,
                start_date: "2018".to_string(),
                end_date: Some("2022".to_string()),
            }],
            skills: Skills {
                technical: vec!["Rust".to_string(), "Postgres".to_string()],
                tools: vec![],
                soft: vec!["Communication".to_string()],
                categorized: None,
            },
            certifications: vec![],
            projects: vec![],
            languages: vec![],
        }
    }

    pub struct StubGenerator(pub Bytes);

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(
            &self,
            _template_id: &str,
            _resume: &ResumeDocument,
        ) -> Result<Bytes, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    pub struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(
            &self,
            _template_id: &str,
            _resume: &ResumeDocument,
        ) -> Result<Bytes, CollaboratorError> {
            Err(CollaboratorError::Service {
                status: 500,
                message: "Unexpected error while generating the DOCX.".to_string(),
            })
        }
    }

    #[derive(Default)]
    pub struct RecordingStore {
        pub records: Mutex<Vec<NewResumeRecord>>,
        pub fail: bool,
    }

    #[async_trait]
    impl ResumeStore for RecordingStore {
        async fn insert_resume(&self, record: &NewResumeRecord) -> Result<(), CollaboratorError> {
            if self.fail {
                return Err(CollaboratorError::Unexpected { status: 503 });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn list_resumes(
            &self,
            _user_id: Uuid,
        ) -> Result<Vec<StoredResume>, CollaboratorError> {
            Ok(vec![])
        }
    }
}
