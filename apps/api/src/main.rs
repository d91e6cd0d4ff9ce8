mod config;
mod errors;
mod extraction;
mod models;
mod optimization;
mod providers;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::optimization::orchestrator::Orchestrator;
use crate::providers::ProviderRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Build the provider registry (declaration order = priority order)
    let registry = Arc::new(ProviderRegistry::from_config(&config));
    for provider in registry.summaries() {
        info!(
            "Provider {}: {}",
            provider.name,
            if provider.configured {
                "configured"
            } else {
                "not configured"
            }
        );
    }
    if registry.configured_count() == 0 {
        warn!("No AI provider credentials configured; every optimization will fail");
    }

    // Initialize the orchestrator
    let orchestrator = Orchestrator::from_config(registry.clone(), &config)?;
    info!(
        "Orchestrator initialized (timeout {}s, rate-limit delay {}s)",
        config.provider_timeout_secs, config.rate_limit_retry_delay_secs
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        registry,
        optimizer: Arc::new(orchestrator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict to PUBLIC_ORIGIN once the UI is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
