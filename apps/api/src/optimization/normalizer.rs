//! Response Normalizer: the only boundary between untrusted provider text and the
//! canonical `ResumeProfile`.
//!
//! Pipeline: slice the `{...}` span → parse → validate the minimal shape → coerce every
//! field to its default. Only the first three steps can fail.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::resume::{
    Certification, Education, Experience, Project, ResumeProfile, Skills,
};

pub const PLACEHOLDER_NAME: &str = "Name not provided";
pub const PLACEHOLDER_POSITION: &str = "Professional";
pub const PLACEHOLDER_AREA: &str = "Professional Area";
pub const PLACEHOLDER_EMAIL: &str = "email@example.com";
pub const PLACEHOLDER_PHONE: &str = "(00) 00000-0000";
pub const PLACEHOLDER_LINKEDIN: &str = "linkedin.com/in/profile";
pub const PLACEHOLDER_LOCATION: &str = "Location not provided";
pub const PLACEHOLDER_SUMMARY: &str = "Professional with experience relevant to the position.";

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The text held no parseable object, or the object failed shape validation.
    /// `raw` keeps the provider text for diagnostics.
    #[error("invalid résumé structure: {reason}")]
    InvalidStructure { reason: String, raw: String },
}

impl NormalizeError {
    fn invalid(reason: impl Into<String>, raw: &str) -> Self {
        NormalizeError::InvalidStructure {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            NormalizeError::InvalidStructure { raw, .. } => raw,
        }
    }
}

/// Normalizes raw provider text into a `ResumeProfile`.
///
/// Deterministic: the same input always yields a field-for-field identical profile.
pub fn normalize(raw_text: &str) -> Result<ResumeProfile, NormalizeError> {
    let candidate = extract_json_span(raw_text);

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| NormalizeError::invalid(format!("not valid JSON: {e}"), raw_text))?;
    let object = value
        .as_object()
        .ok_or_else(|| NormalizeError::invalid("top-level value is not an object", raw_text))?;

    validate_shape(object).map_err(|reason| NormalizeError::invalid(reason, raw_text))?;

    Ok(coerce_profile(object))
}

/// Slices from the first `{` to the last `}`. Providers often wrap JSON in prose or
/// code fences; without a brace pair the whole (trimmed) text is the candidate.
pub fn extract_json_span(raw_text: &str) -> &str {
    let trimmed = raw_text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Minimal contract a provider object must meet before coercion.
fn validate_shape(object: &Map<String, Value>) -> Result<(), String> {
    for key in ["name", "email", "summary"] {
        if !object.get(key).is_some_and(Value::is_string) {
            return Err(format!("field '{key}' must be a string"));
        }
    }
    for key in ["experience", "education"] {
        if !object.get(key).is_some_and(Value::is_array) {
            return Err(format!("field '{key}' must be a list"));
        }
    }
    if !object.get("skills").is_some_and(Value::is_object) {
        return Err("field 'skills' must be an object".to_string());
    }
    Ok(())
}

fn coerce_profile(object: &Map<String, Value>) -> ResumeProfile {
    let skills = object.get("skills").and_then(Value::as_object);
    let skill_list = |key: &str| {
        skills
            .map(|s| string_list(s.get(key)))
            .unwrap_or_default()
    };

    ResumeProfile {
        name: text_or(object.get("name"), PLACEHOLDER_NAME),
        position: text_or(object.get("position"), PLACEHOLDER_POSITION),
        area: text_or(object.get("area"), PLACEHOLDER_AREA),
        email: text_or(object.get("email"), PLACEHOLDER_EMAIL),
        phone: text_or(object.get("phone"), PLACEHOLDER_PHONE),
        linkedin: text_or(object.get("linkedin"), PLACEHOLDER_LINKEDIN),
        location: text_or(object.get("location"), PLACEHOLDER_LOCATION),
        summary: text_or(object.get("summary"), PLACEHOLDER_SUMMARY),
        skills: Skills {
            programming: skill_list("programming"),
            frameworks: skill_list("frameworks"),
            databases: skill_list("databases"),
            tools: skill_list("tools"),
            methodologies: skill_list("methodologies"),
            languages: skill_list("languages"),
        },
        experience: entries(object.get("experience"), |e| Experience {
            company: text_or(e.get("company"), "Company not provided"),
            position: text_or(e.get("position"), "Position not provided"),
            period: text_or(e.get("period"), "Period not provided"),
            location: text_or(e.get("location"), "Location not provided"),
            achievements: string_list(e.get("achievements")),
        }),
        education: entries(object.get("education"), |e| Education {
            institution: text_or(e.get("institution"), "Institution not provided"),
            degree: text_or(e.get("degree"), "Degree not provided"),
            course: text_or(e.get("course"), "Course not provided"),
            year: text_or(e.get("year"), "Year not provided"),
            location: text_or(e.get("location"), "Location not provided"),
            projects: string_list(e.get("projects")),
        }),
        certifications: entries(object.get("certifications"), |e| Certification {
            name: text_or(e.get("name"), "Certification not provided"),
            institution: text_or(e.get("institution"), "Institution not provided"),
            year: text_or(e.get("year"), "Year not provided"),
        }),
        projects: entries(object.get("projects"), |e| Project {
            name: text_or(e.get("name"), "Project not provided"),
            technologies: string_list(e.get("technologies")),
            description: text_or(e.get("description"), "Description not provided"),
            achievements: string_list(e.get("achievements")),
            link: scalar_text(e.get("link")),
        }),
        achievements: string_list(object.get("achievements")),
        activities: string_list(object.get("activities")),
        keywords: string_list(object.get("keywords")),
    }
}

/// Trimmed text of a string, number or boolean. Blank strings count as absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn text_or(value: Option<&Value>, placeholder: &str) -> String {
    scalar_text(value).unwrap_or_else(|| placeholder.to_string())
}

/// Non-list values become an empty list; non-scalar and blank items are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|item| scalar_text(Some(item))).collect())
        .unwrap_or_default()
}

/// Keeps only object items, preserving provider order.
fn entries<T>(value: Option<&Value>, build: impl Fn(&Map<String, Value>) -> T) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).map(build).collect())
        .unwrap_or_default()
}
