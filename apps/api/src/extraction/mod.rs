//! Extraction: turns an uploaded PDF résumé into plain text plus a rough section split.
//!
//! The split is a heading-keyword heuristic. It only feeds previews; the optimizer always
//! receives the full text.

pub mod handlers;

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Lines at the top of a résumé treated as the personal header.
const PERSONAL_INFO_LINES: usize = 10;

const EXPERIENCE_HEADINGS: &[&str] = &["experiência", "experience", "trabalho", "emprego"];
const EDUCATION_HEADINGS: &[&str] = &["educação", "education", "formação", "acadêmica"];
const SKILLS_HEADINGS: &[&str] = &["habilidades", "skills", "competências", "tecnologias"];
const PROJECTS_HEADINGS: &[&str] = &["projetos", "projects", "portfolio"];

/// Headings that close whatever section is open when a line starts with them.
const SECTION_BOUNDARIES: &[&str] = &[
    "experiência",
    "experience",
    "educação",
    "education",
    "formação",
    "habilidades",
    "skills",
    "competências",
    "projetos",
    "projects",
    "certificações",
    "certifications",
    "conquistas",
    "achievements",
];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("the uploaded file is empty")]
    EmptyFile,

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeSections {
    pub personal_info: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub projects: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedResume {
    pub text: String,
    pub sections: ResumeSections,
}

/// Extracts the text of an in-memory PDF and splits it into sections.
///
/// `pdf-extract` is CPU-bound; async callers should run this on the blocking pool.
pub fn extract_resume(bytes: &[u8]) -> Result<ExtractedResume, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyFile);
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(structure_text(&text))
}

/// Builds the section view over already-extracted text.
pub fn structure_text(text: &str) -> ExtractedResume {
    let text = text.trim().to_string();
    let sections = ResumeSections {
        personal_info: personal_info(&text),
        experience: section(&text, EXPERIENCE_HEADINGS),
        education: section(&text, EDUCATION_HEADINGS),
        skills: section(&text, SKILLS_HEADINGS),
        projects: section(&text, PROJECTS_HEADINGS),
    };

    ExtractedResume { text, sections }
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
    })
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(?\d{2}\)?\s*\d{4,5}-?\d{4}").expect("valid regex"))
}

fn linkedin_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)linkedin\.com/in/[a-zA-Z0-9-]+").expect("valid regex"))
}

fn personal_info(text: &str) -> String {
    let mut info = text
        .lines()
        .take(PERSONAL_INFO_LINES)
        .collect::<Vec<_>>()
        .join(" ");

    let contacts = [
        ("Email", email_pattern()),
        ("Phone", phone_pattern()),
        ("LinkedIn", linkedin_pattern()),
    ];
    for (label, pattern) in contacts {
        if let Some(found) = pattern.find(text) {
            info.push_str(&format!(" | {label}: {}", found.as_str()));
        }
    }

    info
}

/// From the first line mentioning one of `headings` up to (not including) the next line
/// that starts with a different section's heading.
fn section(text: &str, headings: &[&str]) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let lowered: Vec<String> = lines.iter().map(|l| l.to_lowercase()).collect();

    let Some(start) = lowered
        .iter()
        .position(|line| headings.iter().any(|h| line.contains(h)))
    else {
        return String::new();
    };

    let end = lowered
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| {
            let line = line.trim();
            !line.is_empty()
                && SECTION_BOUNDARIES
                    .iter()
                    .any(|b| line.starts_with(b) && !headings.contains(b))
        })
        .map(|(i, _)| i)
        .unwrap_or(lines.len());

    lines[start..end].join("\n").trim().to_string()
}
