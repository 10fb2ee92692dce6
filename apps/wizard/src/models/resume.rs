//! Canonical resume document model.
//!
//! Every input path (manual wizard steps, file extraction) converges to
//! `ResumeDocument` before leaving this service. Collection groups are never
//! absent: `#[serde(default)]` guarantees that a missing group deserializes
//! to an empty sequence, so downstream consumers (preview, generation,
//! persistence) never branch on "missing vs empty".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    #[serde(default)]
    pub headline: Option<String>,
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    /// Absent for in-progress degrees.
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A categorized skill value: either a pre-joined string or a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategorizedValue {
    One(String),
    Many(Vec<String>),
}

impl CategorizedValue {
    pub fn joined(&self) -> String {
        match self {
            CategorizedValue::One(value) => value.clone(),
            CategorizedValue::Many(values) => values.join(", "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub categorized: Option<BTreeMap<String, CategorizedValue>>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty()
            && self.tools.is_empty()
            && self.soft.is_empty()
            && self.categorized.as_ref().map_or(true, |map| map.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub extracurricular_experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: Vec<Language>,
}

impl ResumeDocument {
    /// Single normalization pass applied at the model boundary.
    ///
    /// After this call the document upholds the canonical invariants:
    /// optional fields never hold blank strings, a `current` experience has
    /// no end date, list items are trimmed with blanks stripped, and skill
    /// sequences are deduplicated in first-seen order.
    pub fn normalized(mut self) -> Self {
        self.personal_info.headline = none_if_blank(self.personal_info.headline.take());
        self.personal_info.linkedin = none_if_blank(self.personal_info.linkedin.take());
        self.personal_info.github = none_if_blank(self.personal_info.github.take());
        self.personal_info.portfolio = none_if_blank(self.personal_info.portfolio.take());
        self.summary = none_if_blank(self.summary.take());

        for exp in self
            .experiences
            .iter_mut()
            .chain(self.extracurricular_experiences.iter_mut())
        {
            exp.location = none_if_blank(exp.location.take());
            if exp.current {
                exp.end_date = None;
            } else {
                exp.end_date = none_if_blank(exp.end_date.take());
            }
            exp.achievements = clean_items(std::mem::take(&mut exp.achievements));
        }

        for edu in &mut self.education {
            edu.location = none_if_blank(edu.location.take());
            edu.end_date = none_if_blank(edu.end_date.take());
        }

        self.skills.technical = dedup_items(std::mem::take(&mut self.skills.technical));
        self.skills.tools = dedup_items(std::mem::take(&mut self.skills.tools));
        self.skills.soft = dedup_items(std::mem::take(&mut self.skills.soft));
        if self
            .skills
            .categorized
            .as_ref()
            .is_some_and(|map| map.is_empty())
        {
            self.skills.categorized = None;
        }

        for cert in &mut self.certifications {
            cert.url = none_if_blank(cert.url.take());
        }
        for project in &mut self.projects {
            project.url = none_if_blank(project.url.take());
            project.highlights = clean_items(std::mem::take(&mut project.highlights));
            project.technologies = dedup_items(std::mem::take(&mut project.technologies));
        }

        self
    }
}

/// Coalesces blank optional strings to `None` so the canonical model never
/// distinguishes "empty string" from "absent".
pub fn none_if_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits comma-separated free text into trimmed, non-empty, deduplicated
/// items, preserving first-seen order.
pub fn split_csv(input: &str) -> Vec<String> {
    dedup_items(input.split(',').map(str::to_string).collect())
}

/// Splits newline-separated free text into trimmed, non-empty lines.
pub fn split_lines(input: &str) -> Vec<String> {
    clean_items(input.lines().map(str::to_string).collect())
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn dedup_items(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in clean_items(items) {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
