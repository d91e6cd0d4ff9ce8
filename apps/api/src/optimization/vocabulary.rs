//! Curated multi-domain keyword dictionary used by the local job analyzer.
//!
//! Terms are lowercase. Portuguese and English spellings live side by side
//! because postings arrive in either language.

/// Broad family a vocabulary term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermCategory {
    Technology,
    Business,
    Domain,
    Emerging,
    Data,
}

impl TermCategory {
    /// Hard skills a candidate lists under "skills" rather than in prose.
    pub fn is_hard_skill(self) -> bool {
        matches!(
            self,
            TermCategory::Technology | TermCategory::Emerging | TermCategory::Data
        )
    }
}

pub struct Term {
    pub text: &'static str,
    pub category: TermCategory,
}

const fn term(text: &'static str, category: TermCategory) -> Term {
    Term { text, category }
}

use TermCategory::{Business, Data, Domain, Emerging, Technology};

pub const VOCABULARY: &[Term] = &[
    // Programming and development
    term("excel", Technology),
    term("powerbi", Technology),
    term("power bi", Technology),
    term("sql", Technology),
    term("python", Technology),
    term("javascript", Technology),
    term("typescript", Technology),
    term("react", Technology),
    term("node", Technology),
    term("node.js", Technology),
    term("java", Technology),
    term("c#", Technology),
    term(".net", Technology),
    term("html", Technology),
    term("css", Technology),
    term("angular", Technology),
    term("vue", Technology),
    term("php", Technology),
    term("ruby", Technology),
    term("go", Technology),
    term("golang", Technology),
    term("rust", Technology),
    term("swift", Technology),
    term("kotlin", Technology),
    term("c++", Technology),
    // Management and business
    term("gestão", Business),
    term("management", Business),
    term("liderança", Business),
    term("leadership", Business),
    term("projetos", Business),
    term("project management", Business),
    term("scrum", Business),
    term("agile", Business),
    term("ágil", Business),
    term("kanban", Business),
    term("pmp", Business),
    term("lean", Business),
    term("six sigma", Business),
    term("vendas", Business),
    term("sales", Business),
    term("marketing", Business),
    term("crm", Business),
    term("negociação", Business),
    term("negotiation", Business),
    term("atendimento", Business),
    term("customer service", Business),
    term("relacionamento", Business),
    // Specific domains
    term("saúde", Domain),
    term("healthcare", Domain),
    term("enfermagem", Domain),
    term("nursing", Domain),
    term("medicina", Domain),
    term("psicologia", Domain),
    term("psychology", Domain),
    term("fisioterapia", Domain),
    term("farmácia", Domain),
    term("pharmacy", Domain),
    term("direito", Domain),
    term("jurídico", Domain),
    term("legal", Domain),
    term("advocacia", Domain),
    term("contratos", Domain),
    term("contracts", Domain),
    term("compliance", Domain),
    term("tributário", Domain),
    term("finanças", Domain),
    term("finance", Domain),
    term("contabilidade", Domain),
    term("accounting", Domain),
    term("auditoria", Domain),
    term("audit", Domain),
    term("controladoria", Domain),
    term("fiscal", Domain),
    term("rh", Domain),
    term("recursos humanos", Domain),
    term("human resources", Domain),
    term("recrutamento", Domain),
    term("recruiting", Domain),
    term("seleção", Domain),
    term("treinamento", Domain),
    term("training", Domain),
    term("educação", Domain),
    term("education", Domain),
    term("ensino", Domain),
    term("pedagogia", Domain),
    term("didática", Domain),
    term("coordenação", Domain),
    term("engenharia", Domain),
    term("engineering", Domain),
    term("civil", Domain),
    term("mecânica", Domain),
    term("elétrica", Domain),
    term("produção", Domain),
    term("qualidade", Domain),
    term("quality", Domain),
    // Emerging technologies
    term("ia", Emerging),
    term("ai", Emerging),
    term("inteligência artificial", Emerging),
    term("artificial intelligence", Emerging),
    term("machine learning", Emerging),
    term("deep learning", Emerging),
    term("llm", Emerging),
    term("low code", Emerging),
    term("no code", Emerging),
    term("automação", Emerging),
    term("automation", Emerging),
    term("rpa", Emerging),
    term("chatbot", Emerging),
    term("apis", Emerging),
    term("api", Emerging),
    term("rest", Emerging),
    term("graphql", Emerging),
    term("microserviços", Emerging),
    term("microservices", Emerging),
    term("webhooks", Emerging),
    term("scraping", Emerging),
    term("integrações", Emerging),
    term("integrations", Emerging),
    term("cloud", Emerging),
    term("aws", Emerging),
    term("azure", Emerging),
    term("google cloud", Emerging),
    term("gcp", Emerging),
    term("docker", Emerging),
    term("kubernetes", Emerging),
    term("terraform", Emerging),
    term("saas", Emerging),
    term("devops", Emerging),
    term("ci/cd", Emerging),
    term("git", Emerging),
    term("github", Emerging),
    term("gitlab", Emerging),
    // Data and analytics
    term("dados", Data),
    term("data", Data),
    term("analytics", Data),
    term("bi", Data),
    term("business intelligence", Data),
    term("tableau", Data),
    term("qlik", Data),
    term("big data", Data),
    term("hadoop", Data),
    term("spark", Data),
    term("kafka", Data),
    term("elasticsearch", Data),
    term("mongodb", Data),
    term("postgresql", Data),
    term("postgres", Data),
    term("mysql", Data),
    term("oracle", Data),
    term("redis", Data),
    term("nosql", Data),
];

/// Returns true when `term` occurs in `line` delimited by non-alphanumeric characters.
///
/// Plain substring search would match "go" inside "google" or "ia" inside "experiência".
pub fn contains_term(line: &str, term: &str) -> bool {
    line.match_indices(term).any(|(start, matched)| {
        let before = line[..start].chars().next_back();
        let after = line[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
