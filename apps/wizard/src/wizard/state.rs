//! Wizard state machine.
//!
//! A `WizardState` is created fresh for one creation session, mutated only
//! by explicit user events (step submits, list edits, navigation), and
//! discarded on reset. It has no durability across restarts. Forward
//! transitions are gated by the active step's validator; backward
//! transitions are unconditional and never discard accumulated data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeDocument;
use crate::templates::DEFAULT_TEMPLATE_ID;
use crate::wizard::forms::{EducationForm, ExperienceForm, PersonalForm, SummaryForm};
use crate::wizard::validate::ValidationErrors;

/// Ordered, fixed sequence of wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Personal,
    SummarySkills,
    Experience,
    Education,
    Template,
}

impl Step {
    pub const ORDER: [Step; 5] = [
        Step::Personal,
        Step::SummarySkills,
        Step::Experience,
        Step::Education,
        Step::Template,
    ];

    pub fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Personal => "personal",
            Step::SummarySkills => "summary_skills",
            Step::Experience => "experience",
            Step::Education => "education",
            Step::Template => "template",
        }
    }

    fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }
}

/// Discrete progress phases of the upload-and-extract flow. There is no
/// continuous percentage; the flow is either idle, in one of two in-flight
/// phases, or done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    #[default]
    Idle,
    ExtractingText,
    Analyzing,
    Done,
}

impl UploadStage {
    pub fn in_flight(self) -> bool {
        matches!(self, UploadStage::ExtractingText | UploadStage::Analyzing)
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("the {expected} step is not active")]
    StepMismatch { expected: &'static str },

    #[error("validation failed")]
    Invalid(ValidationErrors),

    #[error("cannot continue from the {0} step")]
    NotAListStep(&'static str),

    #[error("add at least one education entry before continuing")]
    EducationRequired,

    #[error("no entry at index {0}")]
    NoSuchEntry(usize),

    #[error("personal details have not been submitted")]
    PersonalMissing,

    #[error("another upload is already in progress")]
    UploadInFlight,
}

/// In-memory state of one resume creation session.
#[derive(Debug, Clone)]
pub struct WizardState {
    current_step: Step,
    personal: Option<PersonalForm>,
    summary: Option<SummaryForm>,
    experiences: Vec<ExperienceForm>,
    educations: Vec<EducationForm>,
    template_id: String,
    done: bool,
    /// Canonical document delivered by the upload-and-extract flow. When
    /// present it supersedes the accumulated step payloads at assembly.
    extracted: Option<ResumeDocument>,
    upload_stage: UploadStage,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: Step::Personal,
            personal: None,
            summary: None,
            experiences: Vec::new(),
            educations: Vec::new(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            done: false,
            extracted: None,
            upload_stage: UploadStage::Idle,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn personal(&self) -> Option<&PersonalForm> {
        self.personal.as_ref()
    }

    pub fn summary(&self) -> Option<&SummaryForm> {
        self.summary.as_ref()
    }

    pub fn experiences(&self) -> &[ExperienceForm] {
        &self.experiences
    }

    pub fn educations(&self) -> &[EducationForm] {
        &self.educations
    }

    pub fn extracted(&self) -> Option<&ResumeDocument> {
        self.extracted.as_ref()
    }

    pub fn upload_stage(&self) -> UploadStage {
        self.upload_stage
    }

    fn expect_step(&self, expected: Step) -> Result<(), WizardError> {
        if self.current_step == expected {
            Ok(())
        } else {
            Err(WizardError::StepMismatch {
                expected: expected.name(),
            })
        }
    }

    /// Commits personal details and advances to the summary step. On
    /// validation failure nothing is committed and the step does not move.
    pub fn submit_personal(&mut self, form: PersonalForm) -> Result<(), WizardError> {
        self.expect_step(Step::Personal)?;
        form.validate().map_err(WizardError::Invalid)?;
        self.personal = Some(form);
        self.current_step = Step::SummarySkills;
        Ok(())
    }

    /// Commits the summary/skills payload and advances to the experience step.
    pub fn submit_summary(&mut self, form: SummaryForm) -> Result<(), WizardError> {
        self.expect_step(Step::SummarySkills)?;
        form.validate().map_err(WizardError::Invalid)?;
        self.summary = Some(form);
        self.current_step = Step::Experience;
        Ok(())
    }

    /// Appends one experience entry. List-building steps do not advance on
    /// submit; continuing is a separate explicit action.
    pub fn add_experience(&mut self, form: ExperienceForm) -> Result<(), WizardError> {
        self.expect_step(Step::Experience)?;
        form.validate().map_err(WizardError::Invalid)?;
        self.experiences.push(form);
        Ok(())
    }

    pub fn remove_experience(&mut self, index: usize) -> Result<(), WizardError> {
        self.expect_step(Step::Experience)?;
        if index >= self.experiences.len() {
            return Err(WizardError::NoSuchEntry(index));
        }
        self.experiences.remove(index);
        Ok(())
    }

    pub fn add_education(&mut self, form: EducationForm) -> Result<(), WizardError> {
        self.expect_step(Step::Education)?;
        form.validate().map_err(WizardError::Invalid)?;
        self.educations.push(form);
        Ok(())
    }

    pub fn remove_education(&mut self, index: usize) -> Result<(), WizardError> {
        self.expect_step(Step::Education)?;
        if index >= self.educations.len() {
            return Err(WizardError::NoSuchEntry(index));
        }
        self.educations.remove(index);
        Ok(())
    }

    /// Explicit continue from a list-building step. Experience is ungated;
    /// education requires at least one entry.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        match self.current_step {
            Step::Experience => {
                self.current_step = Step::Education;
                Ok(())
            }
            Step::Education => {
                if self.educations.is_empty() {
                    return Err(WizardError::EducationRequired);
                }
                self.current_step = Step::Template;
                Ok(())
            }
            step => Err(WizardError::NotAListStep(step.name())),
        }
    }

    /// Unconditional backward transition. Does not re-validate and does not
    /// discard data accumulated in later steps; saturates at the first step.
    pub fn back(&mut self) {
        if let Some(prev) = self.current_step.prev() {
            self.current_step = prev;
        }
    }

    /// Selects the rendering template. Unknown ids are accepted and pass
    /// through to generation untouched; a blank id falls back to the default.
    pub fn select_template(&mut self, template_id: &str) -> Result<(), WizardError> {
        self.expect_step(Step::Template)?;
        let trimmed = template_id.trim();
        self.template_id = if trimmed.is_empty() {
            DEFAULT_TEMPLATE_ID.to_string()
        } else {
            trimmed.to_string()
        };
        Ok(())
    }

    /// Installs a canonical document produced by the upload flow and rejoins
    /// the manual path at the review/template step.
    pub fn install_extracted(&mut self, document: ResumeDocument) {
        self.extracted = Some(document);
        self.current_step = Step::Template;
    }

    /// Guards the upload flow: one file at a time per session.
    pub fn begin_upload(&mut self) -> Result<(), WizardError> {
        if self.upload_stage.in_flight() {
            return Err(WizardError::UploadInFlight);
        }
        self.upload_stage = UploadStage::ExtractingText;
        Ok(())
    }

    pub fn set_upload_stage(&mut self, stage: UploadStage) {
        self.upload_stage = stage;
    }

    /// Marks the session complete after a successful generation. Distinct
    /// from the step index: the step stays on Template so a generation
    /// failure leaves the user able to retry.
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Discards everything and returns to the first step.
    pub fn reset(&mut self) {
        *self = WizardState::default();
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            current_step: self.current_step,
            step_index: self.current_step.index(),
            done: self.done,
            template_id: self.template_id.clone(),
            experiences: self.experiences.clone(),
            educations: self.educations.clone(),
            upload_stage: self.upload_stage,
            has_extracted: self.extracted.is_some(),
        }
    }
}

/// Client-facing view of a wizard session.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub current_step: Step,
    pub step_index: usize,
    pub done: bool,
    pub template_id: String,
    pub experiences: Vec<ExperienceForm>,
    pub educations: Vec<EducationForm>,
    pub upload_stage: UploadStage,
    pub has_extracted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::forms::fixtures;

    fn state_at_experience() -> WizardState {
        let mut state = WizardState::new();
        state.submit_personal(fixtures::personal()).unwrap();
        state.submit_summary(fixtures::summary()).unwrap();
        state
    }

    #[test]
    fn test_valid_personal_submit_advances_and_accumulates() {
        let mut state = WizardState::new();
        let form = fixtures::personal();
        state.submit_personal(form.clone()).unwrap();
        assert_eq!(state.current_step(), Step::SummarySkills);
        assert_eq!(state.personal(), Some(&form));
    }

    #[test]
    fn test_invalid_submit_does_not_advance_or_overwrite() {
        let mut state = WizardState::new();
        state.submit_personal(fixtures::personal()).unwrap();
        state.back();
        assert_eq!(state.current_step(), Step::Personal);

        let mut bad = fixtures::personal();
        bad.email = "nope".to_string();
        let err = state.submit_personal(bad).unwrap_err();
        assert!(matches!(err, WizardError::Invalid(_)));
        assert_eq!(state.current_step(), Step::Personal);
        // prior accumulated data for the step is unchanged
        assert_eq!(state.personal().unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_submit_refused_when_step_not_active() {
        let mut state = WizardState::new();
        let err = state.submit_summary(fixtures::summary()).unwrap_err();
        assert!(matches!(err, WizardError::StepMismatch { .. }));
    }

    #[test]
    fn test_list_step_appends_in_order_without_advancing() {
        let mut state = state_at_experience();
        for company in ["First", "Second", "Third"] {
            let mut form = fixtures::experience();
            form.company = company.to_string();
            state.add_experience(form).unwrap();
        }
        assert_eq!(state.current_step(), Step::Experience);
        let companies: Vec<_> = state.experiences().iter().map(|e| e.company.as_str()).collect();
        assert_eq!(companies, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut state = state_at_experience();
        for company in ["First", "Second", "Third"] {
            let mut form = fixtures::experience();
            form.company = company.to_string();
            state.add_experience(form).unwrap();
        }
        state.remove_experience(1).unwrap();
        let companies: Vec<_> = state.experiences().iter().map(|e| e.company.as_str()).collect();
        assert_eq!(companies, vec!["First", "Third"]);

        let err = state.remove_experience(5).unwrap_err();
        assert!(matches!(err, WizardError::NoSuchEntry(5)));
    }

    #[test]
    fn test_experience_continue_is_ungated() {
        let mut state = state_at_experience();
        assert!(state.experiences().is_empty());
        state.advance().unwrap();
        assert_eq!(state.current_step(), Step::Education);
    }

    #[test]
    fn test_education_continue_requires_one_entry() {
        let mut state = state_at_experience();
        state.advance().unwrap();
        let err = state.advance().unwrap_err();
        assert!(matches!(err, WizardError::EducationRequired));

        state.add_education(fixtures::education()).unwrap();
        state.advance().unwrap();
        assert_eq!(state.current_step(), Step::Template);
    }

    #[test]
    fn test_advance_refused_on_form_steps() {
        let mut state = WizardState::new();
        assert!(matches!(state.advance(), Err(WizardError::NotAListStep("personal"))));
    }

    #[test]
    fn test_back_is_unconditional_and_saturates() {
        let mut state = state_at_experience();
        state.back();
        state.back();
        assert_eq!(state.current_step(), Step::Personal);
        state.back();
        assert_eq!(state.current_step(), Step::Personal);
        // accumulated later-step data survives going back
        assert!(state.summary().is_some());
    }

    #[test]
    fn test_select_template_only_at_template_step() {
        let mut state = WizardState::new();
        assert!(state.select_template("template-backend").is_err());

        let mut state = state_at_experience();
        state.advance().unwrap();
        state.add_education(fixtures::education()).unwrap();
        state.advance().unwrap();
        state.select_template("template-backend").unwrap();
        assert_eq!(state.template_id(), "template-backend");

        // unknown ids pass through untouched, blank falls back to default
        state.select_template("template-designer-sr").unwrap();
        assert_eq!(state.template_id(), "template-designer-sr");
        state.select_template("  ").unwrap();
        assert_eq!(state.template_id(), crate::templates::DEFAULT_TEMPLATE_ID);
    }

    #[test]
    fn test_install_extracted_rejoins_at_template_step() {
        let mut state = WizardState::new();
        let doc = crate::assembly::tests_support::sample_document();
        state.install_extracted(doc.clone());
        assert_eq!(state.current_step(), Step::Template);
        assert_eq!(state.extracted(), Some(&doc));
    }

    #[test]
    fn test_begin_upload_rejects_second_in_flight() {
        let mut state = WizardState::new();
        state.begin_upload().unwrap();
        assert!(matches!(state.begin_upload(), Err(WizardError::UploadInFlight)));

        state.set_upload_stage(UploadStage::Analyzing);
        assert!(matches!(state.begin_upload(), Err(WizardError::UploadInFlight)));

        // idle and done both accept a new upload
        state.set_upload_stage(UploadStage::Done);
        state.begin_upload().unwrap();
        assert_eq!(state.upload_stage(), UploadStage::ExtractingText);
    }

    #[test]
    fn test_done_flag_is_distinct_from_step() {
        let mut state = state_at_experience();
        assert!(!state.done());
        state.mark_done();
        assert!(state.done());
        assert_eq!(state.current_step(), Step::Experience);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = state_at_experience();
        state.add_experience(fixtures::experience()).unwrap();
        state.mark_done();
        state.reset();
        assert_eq!(state.current_step(), Step::Personal);
        assert!(!state.done());
        assert!(state.personal().is_none());
        assert!(state.experiences().is_empty());
        assert_eq!(state.template_id(), DEFAULT_TEMPLATE_ID);
    }
}
