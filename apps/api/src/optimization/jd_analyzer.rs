//! Job Description Analyzer: local heuristic that turns a free-text posting into a
//! `JobAnalysis` without a network round-trip.
//!
//! Never fails: absent labels fall back to generic placeholders and every list may be empty.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::optimization::vocabulary::{contains_term, Term, VOCABULARY};

pub const DEFAULT_TITLE: &str = "Professional Position";
pub const DEFAULT_COMPANY: &str = "Company";

const MAX_REQUIREMENTS: usize = 15;
const MAX_KEYWORDS: usize = 20;
const MAX_SKILLS: usize = 20;
const MAX_RESPONSIBILITIES: usize = 15;

/// Heading lines longer than this are treated as content.
const MAX_HEADING_CHARS: usize = 40;

/// Structured summary of a job posting, used to enrich the optimization prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub title: String,
    pub company: String,
    pub keywords: Vec<String>,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub responsibilities: Vec<String>,
}

impl JobAnalysis {
    /// True when a title label was found in the posting.
    pub fn has_title(&self) -> bool {
        self.title != DEFAULT_TITLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Requirements,
    Responsibilities,
    Other,
}

const REQUIREMENT_HEADINGS: &[&str] = &[
    "requisitos",
    "requirements",
    "qualificações",
    "qualifications",
    "diferenciais",
    "desejável",
    "nice to have",
    "must have",
    "what you need",
    "what we're looking for",
    "o que buscamos",
];

const RESPONSIBILITY_HEADINGS: &[&str] = &[
    "responsabilidades",
    "responsibilities",
    "atribuições",
    "atividades",
    "duties",
    "what you will do",
    "what you'll do",
    "o que você vai fazer",
    "o que você fará",
];

const OTHER_HEADINGS: &[&str] = &[
    "benefícios",
    "benefits",
    "sobre a empresa",
    "sobre nós",
    "about us",
    "about the company",
    "perks",
    "como se candidatar",
    "how to apply",
];

const REQUIREMENT_MARKERS: &[&str] = &[
    "requisito",
    "experiência",
    "conhecimento",
    "requirement",
    "required",
    "experience",
    "knowledge",
];

const RESPONSIBILITY_MARKERS: &[&str] = &[
    "responsável",
    "responsabilidade",
    "você irá",
    "responsible for",
    "you will",
];

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:vaga|cargo|posição|posicao|oportunidade|position|role|job title|title)\s*[:\-–—]\s*(.+?)\s*$",
        )
        .expect("title pattern is valid")
    })
}

fn company_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:empresa|companhia|organização|organizacao|company|organization|employer)\s*[:\-–—]\s*(.+?)\s*$",
        )
        .expect("company pattern is valid")
    })
}

/// Analyzes a raw job description.
///
/// - title/company: first line starting with a role/organization label, remainder captured
/// - keywords: vocabulary hits in order of first appearance, deduplicated, capped at 20
/// - skills: the hard-skill subset of the keyword hits
/// - requirements/responsibilities: lines under matching headings, or lines carrying
///   requirement/responsibility markers outside any heading
pub fn analyze(job_text: &str) -> JobAnalysis {
    let mut title = None;
    let mut company = None;
    let mut requirements = Vec::new();
    let mut responsibilities = Vec::new();
    let mut matched_terms: Vec<&Term> = Vec::new();
    let mut section = Section::Preamble;

    for raw_line in job_text.lines() {
        let line = strip_bullet(raw_line);
        if line.is_empty() {
            continue;
        }

        if title.is_none() {
            title = capture_label(title_pattern(), line);
        }
        if company.is_none() {
            company = capture_label(company_pattern(), line);
        }

        let lowered = line.to_lowercase();
        for term in VOCABULARY {
            let already_seen = matched_terms.iter().any(|t| t.text == term.text);
            if !already_seen && contains_term(&lowered, term.text) {
                matched_terms.push(term);
            }
        }

        if let Some((heading, inline)) = heading_section(line) {
            section = heading;
            match (section, inline) {
                (Section::Requirements, Some(text)) => push_unique(&mut requirements, text),
                (Section::Responsibilities, Some(text)) => push_unique(&mut responsibilities, text),
                _ => {}
            }
            continue;
        }

        match section {
            Section::Requirements => push_unique(&mut requirements, line),
            Section::Responsibilities => push_unique(&mut responsibilities, line),
            Section::Preamble | Section::Other => {
                if REQUIREMENT_MARKERS.iter().any(|m| lowered.contains(m)) {
                    push_unique(&mut requirements, line);
                } else if RESPONSIBILITY_MARKERS.iter().any(|m| lowered.contains(m)) {
                    push_unique(&mut responsibilities, line);
                }
            }
        }
    }

    let skills = matched_terms
        .iter()
        .filter(|t| t.category.is_hard_skill())
        .take(MAX_SKILLS)
        .map(|t| t.text.to_string())
        .collect();
    let keywords = matched_terms
        .iter()
        .take(MAX_KEYWORDS)
        .map(|t| t.text.to_string())
        .collect();

    requirements.truncate(MAX_REQUIREMENTS);
    responsibilities.truncate(MAX_RESPONSIBILITIES);

    JobAnalysis {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        company: company.unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
        keywords,
        requirements,
        skills,
        responsibilities,
    }
}

fn capture_label(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '•', '*', '·', '–', '>'])
        .trim()
}

/// Recognizes a heading line, bare (`Requisitos:`) or followed by inline content
/// (`Requirements: 5+ years of Python`). The inline remainder belongs to the new section.
fn heading_section(line: &str) -> Option<(Section, Option<&str>)> {
    let (head, inline) = match line.split_once(':') {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|rest| !rest.is_empty())),
        None => (line, None),
    };
    let heading = head.to_lowercase();
    let heading = heading.trim_start_matches('#').trim();
    if heading.chars().count() > MAX_HEADING_CHARS {
        return None;
    }
    let starts = |phrases: &[&str]| phrases.iter().any(|p| heading.starts_with(p));
    let section = if starts(REQUIREMENT_HEADINGS) {
        Section::Requirements
    } else if starts(RESPONSIBILITY_HEADINGS) {
        Section::Responsibilities
    } else if starts(OTHER_HEADINGS) {
        Section::Other
    } else {
        return None;
    };
    Some((section, inline))
}

fn push_unique(list: &mut Vec<String>, line: &str) {
    if !list.iter().any(|existing| existing == line) {
        list.push(line.to_string());
    }
}
