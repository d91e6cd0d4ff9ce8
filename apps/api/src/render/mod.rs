// Render contract: the export-ready layout of an optimized résumé.
// PDF rasterization happens outside this service; `typst::to_typst` emits the markup
// an external `typst compile` step consumes.

pub mod handlers;
pub mod typst;

use serde::Serialize;
use thiserror::Error;

use crate::models::resume::ResumeProfile;

/// Only the first few projects make it into the exported document.
pub const MAX_FEATURED_PROJECTS: usize = 3;

const FILE_NAME_SUFFIX: &str = "_CV_Optimized.pdf";

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("required field '{0}' is blank")]
    MissingField(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        text: String,
    },
    /// `label: text` on one line, label emphasized.
    Labeled {
        label: String,
        text: String,
    },
    Bullets {
        items: Vec<String>,
    },
    /// A titled entry (job, degree, project) with detail lines and bullets.
    Entry {
        title: String,
        subtitle: String,
        details: Vec<String>,
        bullets: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSection {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDocument {
    pub name: String,
    /// `position | area`
    pub headline: String,
    pub contact: String,
    pub sections: Vec<RenderSection>,
}

impl RenderDocument {
    /// Lays the profile out in export order. Optional sections (certifications,
    /// achievements, activities) are dropped when empty.
    pub fn from_profile(profile: &ResumeProfile) -> Result<Self, RenderError> {
        check_required(profile)?;

        let mut sections = vec![
            section(
                "Professional Summary",
                vec![Block::Paragraph {
                    text: profile.summary.clone(),
                }],
            ),
            section(
                "Technical Skills",
                profile
                    .skills
                    .labeled()
                    .iter()
                    .map(|(label, items)| Block::Labeled {
                        label: label.to_string(),
                        text: items.join(", "),
                    })
                    .collect(),
            ),
            section(
                "Professional Experience",
                profile
                    .experience
                    .iter()
                    .map(|exp| Block::Entry {
                        title: format!("{} | {}", exp.company, exp.position),
                        subtitle: format!("{} | {}", exp.period, exp.location),
                        details: Vec::new(),
                        bullets: exp.achievements.clone(),
                    })
                    .collect(),
            ),
            section(
                "Education",
                profile
                    .education
                    .iter()
                    .map(|edu| {
                        let mut details = vec![edu.location.clone()];
                        if !edu.projects.is_empty() {
                            details.push("Relevant Projects:".to_string());
                        }
                        Block::Entry {
                            title: edu.institution.clone(),
                            subtitle: format!("{} in {} | {}", edu.degree, edu.course, edu.year),
                            details,
                            bullets: edu.projects.clone(),
                        }
                    })
                    .collect(),
            ),
        ];

        if !profile.certifications.is_empty() {
            sections.push(section(
                "Certifications",
                vec![Block::Bullets {
                    items: profile
                        .certifications
                        .iter()
                        .map(|c| format!("{} - {} ({})", c.name, c.institution, c.year))
                        .collect(),
                }],
            ));
        }

        sections.push(section(
            "Featured Projects",
            profile
                .projects
                .iter()
                .take(MAX_FEATURED_PROJECTS)
                .map(|project| {
                    let mut details = vec![project.description.clone()];
                    if let Some(link) = &project.link {
                        details.push(format!("Link: {link}"));
                    }
                    Block::Entry {
                        title: project.name.clone(),
                        subtitle: format!("Technologies: {}", project.technologies.join(", ")),
                        details,
                        bullets: project.achievements.clone(),
                    }
                })
                .collect(),
        ));

        if !profile.achievements.is_empty() {
            sections.push(section(
                "Achievements and Awards",
                vec![Block::Bullets {
                    items: profile.achievements.clone(),
                }],
            ));
        }

        if !profile.activities.is_empty() {
            sections.push(section(
                "Complementary Activities",
                vec![Block::Bullets {
                    items: profile.activities.clone(),
                }],
            ));
        }

        sections.push(section(
            "ATS Keywords",
            vec![Block::Paragraph {
                text: profile.keywords.join(", "),
            }],
        ));

        Ok(RenderDocument {
            name: profile.name.clone(),
            headline: format!("{} | {}", profile.position, profile.area),
            contact: [
                profile.email.clone(),
                profile.phone.clone(),
                format!("LinkedIn: {}", profile.linkedin),
                profile.location.clone(),
            ]
            .join(" | "),
            sections,
        })
    }
}

fn section(title: &str, blocks: Vec<Block>) -> RenderSection {
    RenderSection {
        title: title.to_string(),
        blocks,
    }
}

/// First blank required field, by path.
fn check_required(profile: &ResumeProfile) -> Result<(), RenderError> {
    let top = [
        ("name", &profile.name),
        ("position", &profile.position),
        ("area", &profile.area),
        ("email", &profile.email),
        ("phone", &profile.phone),
        ("linkedin", &profile.linkedin),
        ("location", &profile.location),
        ("summary", &profile.summary),
    ];
    if let Some((field, _)) = top.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(RenderError::MissingField(field.to_string()));
    }

    for (i, exp) in profile.experience.iter().enumerate() {
        for (field, value) in [("company", &exp.company), ("position", &exp.position)] {
            if value.trim().is_empty() {
                return Err(RenderError::MissingField(format!("experience[{i}].{field}")));
            }
        }
    }
    for (i, edu) in profile.education.iter().enumerate() {
        if edu.institution.trim().is_empty() {
            return Err(RenderError::MissingField(format!(
                "education[{i}].institution"
            )));
        }
    }
    for (i, project) in profile.projects.iter().enumerate() {
        if project.name.trim().is_empty() {
            return Err(RenderError::MissingField(format!("projects[{i}].name")));
        }
    }

    Ok(())
}

/// `Ana Maria Souza` → `Ana_Maria_Souza_CV_Optimized.pdf`
pub fn file_name(name: &str) -> String {
    let stem = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['/', '\\'], "_");
    format!("{stem}{FILE_NAME_SUFFIX}")
}
