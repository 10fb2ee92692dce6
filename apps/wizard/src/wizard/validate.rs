//! Field-level validation primitives shared by the step forms.
//!
//! Validation is synchronous and local to a step: a failing field maps to a
//! human-readable message, and the step transition is refused until the map
//! is empty. There is no cross-step validation.

use std::collections::BTreeMap;

use serde::Serialize;

/// Mapping from field name to a human-readable message, ordered for stable
/// rendering and test output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Finalizes a validation pass: `Ok` when no field failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Records an error when the trimmed value is shorter than `min` characters.
pub fn check_min_len(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.trim().chars().count() < min {
        errors.push(field, message);
    }
}

/// Records an error when the value is not a plausible email address.
pub fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !is_valid_email(value.trim()) {
        errors.push(field, "Enter a valid email address");
    }
}

/// Minimal structural email check: non-empty local part, a single `@`, and a
/// dotted domain. Deliverability is the collaborators' problem.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("dev.ops+tag@sub.domain.io"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("anaexample.com"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana silva@example.com"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana@example."));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_check_min_len_counts_chars_not_bytes() {
        let mut errors = ValidationErrors::new();
        check_min_len(&mut errors, "location", "São", 3, "too short");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_min_len_ignores_surrounding_whitespace() {
        let mut errors = ValidationErrors::new();
        check_min_len(&mut errors, "full_name", "  ab  ", 3, "too short");
        assert_eq!(errors.fields()["full_name"], "too short");
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let mut errors = ValidationErrors::new();
        errors.push("email", "Enter a valid email address");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_serializes_as_flat_field_map() {
        let mut errors = ValidationErrors::new();
        errors.push("email", "Enter a valid email address");
        errors.push("full_name", "too short");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"], "Enter a valid email address");
        assert_eq!(json["full_name"], "too short");
    }
}
