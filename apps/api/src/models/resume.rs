use serde::{Deserialize, Serialize};

/// The canonical résumé handed to preview and export layers.
///
/// Every list is present (possibly empty) and every string is non-blank once a
/// profile has passed through the normalizer. Consumers never check for absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub name: String,
    /// Target position title, usually adapted to the job posting.
    pub position: String,
    pub area: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub location: String,
    pub summary: String,
    pub skills: Skills,
    /// Most relevant / most recent first. Order comes from the provider and is kept.
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
    pub achievements: Vec<String>,
    pub activities: Vec<String>,
    /// ATS terms, expected to mirror the job description's vocabulary.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub programming: Vec<String>,
    pub frameworks: Vec<String>,
    pub databases: Vec<String>,
    pub tools: Vec<String>,
    pub methodologies: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub period: String,
    pub location: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub course: String,
    pub year: String,
    pub location: String,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub technologies: Vec<String>,
    pub description: String,
    pub achievements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Skills {
    /// The six categories with their display labels, in export order.
    pub fn labeled(&self) -> [(&'static str, &[String]); 6] {
        [
            ("Programming Languages", &self.programming),
            ("Frameworks", &self.frameworks),
            ("Databases", &self.databases),
            ("Tools", &self.tools),
            ("Methodologies", &self.methodologies),
            ("Languages", &self.languages),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.labeled().iter().all(|(_, items)| items.is_empty())
    }
}

impl ResumeProfile {
    /// A clearly labeled sample profile for callers that prefer showing an example
    /// over an error screen. The optimization pipeline never returns this on its own.
    pub fn demonstration() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        ResumeProfile {
            name: "DEMONSTRATION PROFILE".to_string(),
            position: "Specialist in the Target Area".to_string(),
            area: "Relevant Professional Area".to_string(),
            email: "example@email.com".to_string(),
            phone: "(11) 99999-9999".to_string(),
            linkedin: "linkedin.com/in/example-profile".to_string(),
            location: "São Paulo, SP".to_string(),
            summary: "Qualified professional with experience relevant to the described \
                position. This is an example of how your résumé would look after being \
                optimized against the job description you provided."
                .to_string(),
            skills: Skills {
                programming: strings(&["Technical Skill 1", "Technical Skill 2", "Technical Skill 3"]),
                frameworks: strings(&["Tool 1", "Tool 2", "Specific Software"]),
                databases: strings(&["System 1", "System 2"]),
                tools: strings(&["Tool A", "Tool B", "Tool C"]),
                methodologies: strings(&["Methodology 1", "Methodology 2", "Agile Framework"]),
                languages: strings(&["Portuguese (native)", "English (fluent)"]),
            },
            experience: vec![Experience {
                company: "Demonstration Company".to_string(),
                position: "Relevant Position".to_string(),
                period: "Jan/2020 - Present".to_string(),
                location: "São Paulo, SP".to_string(),
                achievements: strings(&[
                    "Quantified achievement relevant to the position with measurable impact",
                    "Responsibility that demonstrates expertise in the area of interest",
                    "Project that resulted in a significant process improvement",
                ]),
            }],
            education: vec![Education {
                institution: "EDUCATIONAL INSTITUTION".to_string(),
                degree: "Bachelor's".to_string(),
                course: "Relevant Course".to_string(),
                year: "2020".to_string(),
                location: "São Paulo, SP".to_string(),
                projects: strings(&["Relevant Academic Project"]),
            }],
            certifications: vec![Certification {
                name: "Relevant Certification".to_string(),
                institution: "Certifying Institution".to_string(),
                year: "2023".to_string(),
            }],
            projects: vec![Project {
                name: "Demonstration Project".to_string(),
                technologies: strings(&["Technology 1", "Technology 2"]),
                description: "Project that demonstrates skills relevant to the position"
                    .to_string(),
                achievements: strings(&["Quantified project result"]),
                link: None,
            }],
            achievements: strings(&["Relevant professional recognition"]),
            activities: strings(&["Complementary activity in the area"]),
            keywords: strings(&["keyword-1", "keyword-2", "relevant-skill"]),
        }
    }
}
