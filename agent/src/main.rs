//! Steward agent entry point.
//!
//! Initializes tracing, loads settings from `STEWARD_AGENT_*` environment
//! variables and the YAML topology file, preloads clients for statically
//! known services, and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use steward_agent::clients::ClientSet;
use steward_agent::config::{AgentConfig, Settings};
use steward_agent::executor::ExecutorBinary;
use steward_agent::http::{AppState, router};
use steward_agent::registry::{HttpRegistry, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("steward-agent starting");

    let settings = Settings::from_env()?;
    let config = AgentConfig::load(&settings.config_file)?;
    tracing::info!(
        listen_addr = %settings.listen_addr,
        config_file = %settings.config_file,
        clients = config.clients.len(),
        mechanism = ?config.metrics_mechanism,
        registry = config.registry_url.is_some(),
        "configuration loaded",
    );

    let clients = ClientSet::new(&config.protocol);
    for (key, info) in &config.clients {
        clients.preload(key, &info.host, info.port).await;
    }
    let registry: Option<Arc<dyn Registry>> = config
        .registry_url
        .as_deref()
        .map(|url| Arc::new(HttpRegistry::new(url)) as Arc<dyn Registry>);
    let executor = Arc::new(
        ExecutorBinary::new(&config.executor_path)
            .with_timeout(Duration::from_secs(config.executor_timeout_secs)),
    );

    let state = AppState {
        config: Arc::new(config),
        clients: Arc::new(clients),
        registry,
        executor,
    };

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .context("failed to bind TCP listener")?;
    tracing::info!(listen_addr = %settings.listen_addr, "serving");
    axum::serve(listener, router(state))
        .await
        .context("HTTP server terminated")?;
    Ok(())
}
