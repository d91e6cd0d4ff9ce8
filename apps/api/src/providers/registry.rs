use serde::Serialize;

use crate::config::Config;
use crate::providers::{catalog, ProviderSpec};

/// Ordered, append-only list of providers. Declaration order is priority order.
///
/// Built once at startup and shared read-only (`Arc<ProviderRegistry>`).
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<ProviderSpec>,
}

/// Public view of a registry entry; never carries the credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub name: String,
    pub credential_env: String,
    pub configured: bool,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider at the lowest priority. Returns `self` for chaining.
    pub fn register(mut self, spec: ProviderSpec) -> Self {
        self.providers.push(spec);
        self
    }

    /// The built-in catalog with credentials taken from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .register(catalog::huggingface(config.huggingface_api_key.clone()))
            .register(catalog::gemini(config.gemini_api_key.clone()))
            .register(catalog::openrouter(
                config.openrouter_api_key.clone(),
                &config.public_origin,
            ))
            .register(catalog::groq(config.groq_api_key.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderSpec> {
        self.providers.iter()
    }

    /// Looks a provider up by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&ProviderSpec> {
        self.providers.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn configured_count(&self) -> usize {
        self.providers.iter().filter(|p| p.is_configured()).count()
    }

    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.providers
            .iter()
            .map(|p| ProviderSummary {
                name: p.name.to_string(),
                credential_env: p.credential_env.to_string(),
                configured: p.is_configured(),
            })
            .collect()
    }
}
