//! Shelling out to the executor binary.
//!
//! The agent never talks to docker itself; lifecycle and executor-mechanism
//! metrics go through the configured `steward-executor` binary, whose stdout
//! is one JSON envelope per invocation.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;

/// Default timeout for one executor invocation. Generous: a lifecycle
/// command may wait on container shutdown.
pub const DEFAULT_EXECUTOR_TIMEOUT: Duration = Duration::from_secs(60);

/// Boundary to the executor binary.
#[async_trait]
pub trait ExecutorCommand: Send + Sync {
    /// Run the executor for `service`/`operation` and hand back its stdout.
    ///
    /// # Errors
    ///
    /// Fails when the binary cannot be run, times out, or exits nonzero.
    async fn call(&self, service: &str, operation: &str) -> Result<String>;
}

/// Production implementation invoking the configured binary.
pub struct ExecutorBinary {
    path: PathBuf,
    timeout: Duration,
}

impl ExecutorBinary {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: DEFAULT_EXECUTOR_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ExecutorCommand for ExecutorBinary {
    async fn call(&self, service: &str, operation: &str) -> Result<String> {
        let mut command = tokio::process::Command::new(&self.path);
        command
            .arg(service)
            .arg(operation)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child via
        // kill_on_drop.
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                anyhow!(
                    "{} timed out after {}s",
                    self.path.display(),
                    self.timeout.as_secs()
                )
            })?
            .with_context(|| format!("failed to run {}", self.path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.path.display(),
                output.status,
                stderr.trim()
            );
        }
        String::from_utf8(output.stdout).context("executor wrote non-utf8 output")
    }
}
