use std::sync::Arc;

use crate::config::Config;
use crate::optimization::orchestrator::ResumeOptimizer;
use crate::providers::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only provider list, also used for the status endpoint.
    pub registry: Arc<ProviderRegistry>,
    /// Pluggable optimizer. Default: the multi-provider `Orchestrator`.
    pub optimizer: Arc<dyn ResumeOptimizer>,
}
