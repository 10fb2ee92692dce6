//! Review projection of a canonical document.
//!
//! Pure function used by the review/template step: every non-empty group of
//! the document becomes a section, every empty group is omitted. Feeding the
//! same document in always yields the same sections, and no section is ever
//! emitted with an empty body.

use serde::Serialize;

use crate::models::resume::{Experience, ResumeDocument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub title: String,
    pub lines: Vec<String>,
}

impl PreviewSection {
    fn new(title: &str, lines: Vec<String>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self {
                title: title.to_string(),
                lines,
            })
        }
    }
}

pub fn preview_sections(doc: &ResumeDocument) -> Vec<PreviewSection> {
    let mut sections = Vec::new();

    sections.extend(header_section(doc));
    sections.extend(
        doc.summary
            .as_ref()
            .and_then(|summary| PreviewSection::new("Professional Summary", vec![summary.clone()])),
    );
    sections.extend(skills_section(doc));
    sections.extend(experience_section(
        "Professional Experience",
        &doc.experiences,
    ));
    sections.extend(experience_section(
        "Extracurricular Experience",
        &doc.extracurricular_experiences,
    ));
    sections.extend(education_section(doc));
    sections.extend(projects_section(doc));
    sections.extend(PreviewSection::new(
        "Certifications",
        doc.certifications
            .iter()
            .map(|cert| format!("{} — {} ({})", cert.name, cert.issuer, cert.date))
            .collect(),
    ));
    sections.extend(PreviewSection::new(
        "Languages",
        doc.languages
            .iter()
            .map(|lang| format!("{} — {}", lang.language, lang.proficiency))
            .collect(),
    ));

    sections
}

fn header_section(doc: &ResumeDocument) -> Option<PreviewSection> {
    let p = &doc.personal_info;
    let mut lines = Vec::new();
    if let Some(headline) = &p.headline {
        lines.push(headline.clone());
    }
    lines.push(format!("Email: {}", p.email));
    lines.push(format!("Phone: {}", p.phone));
    lines.push(format!("Location: {}", p.location));
    if let Some(linkedin) = &p.linkedin {
        lines.push(format!("LinkedIn: {linkedin}"));
    }
    if let Some(github) = &p.github {
        lines.push(format!("GitHub: {github}"));
    }
    if let Some(portfolio) = &p.portfolio {
        lines.push(format!("Portfolio: {portfolio}"));
    }
    PreviewSection::new(&p.full_name, lines)
}

fn skills_section(doc: &ResumeDocument) -> Option<PreviewSection> {
    let skills = &doc.skills;
    let lines = match &skills.categorized {
        Some(map) if !map.is_empty() => map
            .iter()
            .filter_map(|(key, value)| {
                let text = value.joined();
                if text.is_empty() {
                    None
                } else {
                    Some(format!("{}: {}", category_label(key), text))
                }
            })
            .collect(),
        _ => {
            let mut lines = Vec::new();
            let technical: Vec<&str> = skills
                .technical
                .iter()
                .chain(skills.tools.iter())
                .map(String::as_str)
                .collect();
            if !technical.is_empty() {
                lines.push(technical.join(", "));
            }
            if !skills.soft.is_empty() {
                lines.push(format!("Soft skills: {}", skills.soft.join(", ")));
            }
            lines
        }
    };
    PreviewSection::new("Skills", lines)
}

fn category_label(key: &str) -> &str {
    match key {
        "languages" | "linguagens" => "Languages",
        "frontend" => "Frontend",
        "backend" => "Backend",
        "frameworks" => "Frameworks",
        "databases" | "banco_de_dados" => "Databases",
        "tools" | "ferramentas" => "Tools",
        "practices" | "praticas" => "Practices",
        other => other,
    }
}

fn experience_section(title: &str, experiences: &[Experience]) -> Option<PreviewSection> {
    let mut lines = Vec::new();
    for exp in experiences {
        lines.push(format!("{} · {}", exp.company, date_range(exp)));
        match &exp.location {
            Some(location) => lines.push(format!("{} · {}", exp.position, location)),
            None => lines.push(exp.position.clone()),
        }
        for achievement in &exp.achievements {
            lines.push(format!("- {}", achievement.trim_start_matches("- ")));
        }
    }
    PreviewSection::new(title, lines)
}

fn date_range(exp: &Experience) -> String {
    let end = if exp.current {
        "Present"
    } else {
        exp.end_date.as_deref().unwrap_or("")
    };
    if end.is_empty() {
        exp.start_date.clone()
    } else {
        format!("{} – {}", exp.start_date, end)
    }
}

fn education_section(doc: &ResumeDocument) -> Option<PreviewSection> {
    let mut lines = Vec::new();
    for edu in &doc.education {
        lines.push(edu.degree.clone());
        let period = match &edu.end_date {
            Some(end) => format!("{} – {}", edu.start_date, end),
            None => edu.start_date.clone(),
        };
        lines.push(format!("{} · {}", edu.institution, period));
    }
    PreviewSection::new("Education", lines)
}

fn projects_section(doc: &ResumeDocument) -> Option<PreviewSection> {
    let mut lines = Vec::new();
    for project in &doc.projects {
        lines.push(project.name.clone());
        lines.push(project.description.clone());
        for highlight in &project.highlights {
            lines.push(format!("- {highlight}"));
        }
        if !project.technologies.is_empty() {
            lines.push(format!("Technologies: {}", project.technologies.join(", ")));
        }
    }
    PreviewSection::new("Projects", lines)
}
