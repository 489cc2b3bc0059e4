//! Steward executor entry point.
//!
//! Invoked as `steward-executor <service> <operation>`. Prints exactly one
//! result envelope as a single JSON line on stdout and exits zero either way;
//! failures live inside the envelope. Logs go to stderr so they can never
//! contaminate the envelope channel.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use steward_executor::catalog::ServiceCatalog;
use steward_executor::docker::DockerCli;
use steward_executor::execute::execute;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let catalog = ServiceCatalog::from_env();
    let docker = DockerCli::default();

    let envelope = execute(&args, &catalog, &docker).await;
    tracing::debug!(
        operation = %envelope.operation,
        service = %envelope.service,
        success = envelope.success,
        "dispatch finished",
    );
    println!("{}", envelope.to_json()?);
    Ok(())
}
