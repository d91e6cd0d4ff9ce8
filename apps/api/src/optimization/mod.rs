// Résumé optimization engine.
// Implements: job analysis, prompt construction, multi-provider orchestration, normalization.
// All provider traffic goes through the orchestrator; handlers never call a provider directly.

pub mod handlers;
pub mod jd_analyzer;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
pub mod vocabulary;
