//! Per-step form payloads and their validation rulesets.
//!
//! Each step owns an independent schema; a forward transition is permitted
//! only when the active step's form validates. Optional fields submitted as
//! empty strings are coalesced to "no value" during assembly, never here:
//! forms accumulate exactly what the user submitted.

use serde::{Deserialize, Serialize};

use crate::wizard::validate::{check_email, check_min_len, ValidationErrors};

/// Step 1: personal details. The only always-required group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
}

impl PersonalForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(
            &mut errors,
            "full_name",
            &self.full_name,
            3,
            "Full name must be at least 3 characters",
        );
        check_email(&mut errors, "email", &self.email);
        check_min_len(
            &mut errors,
            "phone",
            &self.phone,
            8,
            "Phone must be at least 8 characters",
        );
        check_min_len(
            &mut errors,
            "location",
            &self.location,
            3,
            "Location must be at least 3 characters",
        );
        errors.into_result()
    }
}

/// Step 2: professional summary plus comma-separated skill lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryForm {
    pub summary: String,
    #[serde(default)]
    pub technical: String,
    #[serde(default)]
    pub soft: String,
}

impl SummaryForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(
            &mut errors,
            "summary",
            &self.summary,
            30,
            "Summary is too short (minimum 30 characters)",
        );
        errors.into_result()
    }
}

/// Step 3: one professional experience entry. Achievements arrive as raw
/// newline-separated text and are split during assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceForm {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub achievements: String,
}

impl ExperienceForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(
            &mut errors,
            "company",
            &self.company,
            2,
            "Company must be at least 2 characters",
        );
        check_min_len(
            &mut errors,
            "position",
            &self.position,
            2,
            "Position must be at least 2 characters",
        );
        check_min_len(
            &mut errors,
            "start_date",
            &self.start_date,
            4,
            "Start date must be at least 4 characters",
        );
        check_min_len(
            &mut errors,
            "achievements",
            &self.achievements,
            10,
            "Describe at least one achievement",
        );
        errors.into_result()
    }
}

/// Step 4: one education entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationForm {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

impl EducationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(
            &mut errors,
            "institution",
            &self.institution,
            3,
            "Institution must be at least 3 characters",
        );
        check_min_len(
            &mut errors,
            "degree",
            &self.degree,
            5,
            "Degree must be at least 5 characters",
        );
        check_min_len(
            &mut errors,
            "start_date",
            &self.start_date,
            4,
            "Start year must be at least 4 characters",
        );
        check_min_len(
            &mut errors,
            "end_date",
            &self.end_date,
            4,
            "End year must be at least 4 characters",
        );
        errors.into_result()
    }
}
