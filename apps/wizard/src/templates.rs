//! Fixed template catalog.
//!
//! Templates only affect rendering at generation time; they never alter the
//! canonical document. The set is closed, but unrecognized ids pass through
//! untouched — the label simply falls back to the raw id.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

pub const DEFAULT_TEMPLATE_ID: &str = "template-frontend-jr";

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "template-frontend-jr",
        name: "Frontend Junior",
        description: "For developers early in their career. Highlights projects, education and technical skills.",
        tags: &["1 column", "ATS-friendly", "Junior"],
    },
    Template {
        id: "template-frontend",
        name: "Frontend Mid/Senior",
        description: "For experienced developers. Focus on experience and quantifiable results.",
        tags: &["1 column", "ATS-friendly", "Mid/Senior"],
    },
    Template {
        id: "template-backend",
        name: "Backend",
        description: "Optimized for backend and fullstack. Sections for architecture, APIs and databases.",
        tags: &["1 column", "ATS-friendly", "Backend"],
    },
];

/// Human-readable label for a template id; unknown ids render as themselves.
pub fn template_label(id: &str) -> &str {
    TEMPLATES
        .iter()
        .find(|tpl| tpl.id == id)
        .map(|tpl| tpl.name)
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_three_templates_and_a_valid_default() {
        assert_eq!(TEMPLATES.len(), 3);
        assert!(TEMPLATES.iter().any(|tpl| tpl.id == DEFAULT_TEMPLATE_ID));
    }

    #[test]
    fn test_known_template_label() {
        assert_eq!(template_label("template-backend"), "Backend");
    }

    #[test]
    fn test_unknown_template_label_falls_back_to_raw_id() {
        assert_eq!(template_label("template-designer-sr"), "template-designer-sr");
    }
}
