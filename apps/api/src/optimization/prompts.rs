// Prompt constants for résumé optimization.
// The conversation is built once per request and sent unchanged to every provider.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::optimization::jd_analyzer::JobAnalysis;
use crate::providers::ChatMessage;

/// System instruction: rules, constraints and the JSON-only output contract.
pub const OPTIMIZATION_SYSTEM: &str = "\
You are a senior recruiter and résumé strategist with deep knowledge of \
Applicant Tracking Systems (ATS).

RULES:
- KEEP every professional experience, with its real company, dates and position.
- KEEP all personal data exactly as it appears in the résumé.
- ADAPT the professional title so it matches the target position.
- REWRITE the summary around the competencies the job asks for.
- ENRICH achievement descriptions with the job's exact keywords where the résumé supports them.
- REORDER experiences so the most relevant come first.
- Do NOT invent employers, degrees, dates or contact data.
- Do NOT remove experiences or reduce the number of responsibilities.
- Write in the same language as the résumé.

You MUST respond with valid JSON only. \
Do NOT include any text outside the JSON object. \
Do NOT use markdown code fences. \
Do NOT include explanations or apologies.";

/// Literal output schema embedded in the user message.
pub const RESUME_SCHEMA: &str = r#"{
  "name": "Candidate's real name",
  "position": "Title adapted to the target position",
  "area": "Professional area of the target position",
  "email": "Real e-mail",
  "phone": "Real phone number",
  "linkedin": "Real LinkedIn handle or URL",
  "location": "Real location",
  "summary": "3-4 line summary connecting the candidate to the position, using its keywords",
  "skills": {
    "programming": ["programming languages"],
    "frameworks": ["frameworks and libraries"],
    "databases": ["databases"],
    "tools": ["tools and software"],
    "methodologies": ["methodologies and practices"],
    "languages": ["spoken languages"]
  },
  "experience": [
    {
      "company": "Real company",
      "position": "Real position",
      "period": "Real period",
      "location": "Real location",
      "achievements": ["Real responsibilities rewritten with the job's keywords"]
    }
  ],
  "education": [
    {
      "institution": "Real institution",
      "degree": "Degree",
      "course": "Course name",
      "year": "Completion year",
      "location": "Institution location",
      "projects": ["Academic projects"]
    }
  ],
  "certifications": [
    {"name": "Certification", "institution": "Issuer", "year": "Year"}
  ],
  "projects": [
    {
      "name": "Project name",
      "technologies": ["Technologies used"],
      "description": "Description using the job's keywords",
      "achievements": ["Results"],
      "link": "Link, if mentioned"
    }
  ],
  "achievements": ["Awards and recognitions"],
  "activities": ["Extracurricular activities"],
  "keywords": ["Exact ATS keywords taken from the job description"]
}"#;

/// User message template. Replace: {resume_text}, {job_text}, {job_title}, {job_company},
/// {job_keywords}, {job_requirements}, {job_skills}, {job_responsibilities}, {schema}
pub const OPTIMIZATION_PROMPT_TEMPLATE: &str = r#"Optimize this résumé to maximize its chances of passing ATS screening for the target job.

ORIGINAL RÉSUMÉ:
{resume_text}

TARGET JOB:
{job_text}

JOB ANALYSIS:
- Position: {job_title}
- Company: {job_company}
- Keywords: {job_keywords}
- Requirements: {job_requirements}
- Skills sought: {job_skills}
- Responsibilities: {job_responsibilities}

STRATEGY:
1. Identify the job's critical ATS keywords.
2. Align the professional title with the position.
3. Keep every experience, enriching descriptions with the keywords.
4. Add the job's technical skills the candidate demonstrably has.
5. Rewrite the professional summary around the position.
6. Put the most relevant experiences first.
7. Use empty lists for sections the résumé does not have.

Return a JSON object with EXACTLY this schema:
{schema}"#;

/// Stand-in for a résumé whose text could not be extracted.
const EMPTY_RESUME_NOTICE: &str = "(no text could be extracted from the résumé)";

/// Builds the two-message conversation sent to every provider.
pub fn build_conversation(
    resume_text: &str,
    job_text: &str,
    analysis: &JobAnalysis,
) -> Vec<ChatMessage> {
    let resume_text = if resume_text.trim().is_empty() {
        EMPTY_RESUME_NOTICE
    } else {
        resume_text.trim()
    };

    let keywords = join_or_none(&analysis.keywords);
    let requirements = join_or_none(&analysis.requirements);
    let skills = join_or_none(&analysis.skills);
    let responsibilities = join_or_none(&analysis.responsibilities);

    // One pass over the template: substituted values are never rescanned.
    let user = placeholder_pattern()
        .replace_all(OPTIMIZATION_PROMPT_TEMPLATE, |caps: &Captures| {
            let value: &str = match &caps[1] {
                "resume_text" => resume_text,
                "job_text" => job_text.trim(),
                "job_title" => &analysis.title,
                "job_company" => &analysis.company,
                "job_keywords" => &keywords,
                "job_requirements" => &requirements,
                "job_skills" => &skills,
                "job_responsibilities" => &responsibilities,
                "schema" => RESUME_SCHEMA,
                _ => &caps[0],
            };
            value.to_string()
        })
        .into_owned();

    vec![ChatMessage::system(OPTIMIZATION_SYSTEM), ChatMessage::user(user)]
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none identified".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::jd_analyzer::analyze;
    use crate::providers::Role;

    #[test]
    fn test_conversation_has_system_then_user() {
        let analysis = analyze("Cargo: Data Analyst\nSQL and Python required");
        let messages = build_conversation("Ana Souza\nData analyst", "Cargo: Data Analyst", &analysis);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_user_message_embeds_inputs_analysis_and_schema() {
        let job = "Cargo: Data Analyst\nSQL and Python required";
        let analysis = analyze(job);
        let messages = build_conversation("Ana Souza", job, &analysis);
        let user = &messages[1].content;
        assert!(user.contains("Ana Souza"));
        assert!(user.contains("SQL and Python required"));
        assert!(user.contains("- Position: Data Analyst"));
        assert!(user.contains("sql, python"));
        assert!(user.contains("\"keywords\": [\"Exact ATS keywords"));
        assert!(!user.contains("{schema}"));
    }

    #[test]
    fn test_empty_resume_still_builds_prompt() {
        let analysis = analyze("");
        let messages = build_conversation("   ", "Some job", &analysis);
        assert!(messages[1].content.contains(EMPTY_RESUME_NOTICE));
        assert!(messages[1].content.contains("Keywords: none identified"));
    }

    #[test]
    fn test_braces_in_resume_text_are_not_substituted() {
        let analysis = analyze("");
        let messages = build_conversation("I wrote {job_title} templates", "Job", &analysis);
        assert!(messages[1].content.contains("I wrote {job_title} templates"));
    }

    #[test]
    fn test_placeholders_inside_job_text_stay_literal() {
        let job = "Cargo: {resume_text}\nWrite about {resume_text} here";
        let analysis = analyze(job);
        let messages = build_conversation("SECRET-RESUME-BODY", job, &analysis);
        let user = &messages[1].content;

        assert_eq!(user.matches("SECRET-RESUME-BODY").count(), 1);
        assert!(user.contains("Write about {resume_text} here"));
        let position = user
            .lines()
            .find(|line| line.starts_with("- Position:"))
            .unwrap();
        assert_eq!(position, "- Position: {resume_text}");
    }

    #[test]
    fn test_analysis_values_are_not_rescanned() {
        let job = "Requirements: knowledge of {job_skills} and {schema}";
        let analysis = analyze(job);
        let messages = build_conversation("Ana Souza", job, &analysis);
        let user = &messages[1].content;
        assert!(user.contains("knowledge of {job_skills} and {schema}"));
        assert_eq!(user.matches("\"keywords\": [\"Exact ATS keywords").count(), 1);
    }
}
