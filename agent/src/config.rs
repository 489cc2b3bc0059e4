//! Agent configuration.
//!
//! Runtime settings come from `STEWARD_AGENT_*` environment variables; the
//! service topology (metrics mechanism, executor path, registry, statically
//! known clients) comes from a YAML file. A missing file is a valid empty
//! topology so a bare agent can still start.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::executor::DEFAULT_EXECUTOR_TIMEOUT;

/// Environment settings loaded via `envy`.
///
/// Each field maps to `STEWARD_AGENT_<FIELD>`:
///   - `STEWARD_AGENT_LISTEN_ADDR` (default `0.0.0.0:48090`)
///   - `STEWARD_AGENT_CONFIG_FILE` (default `steward.yaml`)
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path to the YAML topology file.
    #[serde(default = "default_config_file")]
    pub config_file: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:48090".to_string()
}

fn default_config_file() -> String {
    "steward.yaml".to_string()
}

impl Settings {
    /// # Errors
    ///
    /// Fails when a `STEWARD_AGENT_*` variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        envy::prefixed("STEWARD_AGENT_")
            .from_env()
            .context("failed to load settings from STEWARD_AGENT_* env vars")
    }
}

/// How `GET /api/v1/metrics/...` collects its readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsMechanism {
    /// Ask each service's own telemetry endpoint.
    #[default]
    DirectService,
    /// Shell out to the executor binary.
    Executor,
}

/// A statically known service client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientInfo {
    pub host: String,
    pub port: u16,
}

/// Topology configuration read from the YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub metrics_mechanism: MetricsMechanism,
    /// Scheme used for service and registry clients.
    pub protocol: String,
    /// Executor binary the agent shells out to.
    pub executor_path: String,
    /// Seconds one executor invocation may take before it is killed.
    pub executor_timeout_secs: u64,
    /// Registry base URL; absent means a registry-less deployment.
    pub registry_url: Option<String>,
    /// Service key → address of services known without discovery.
    pub clients: BTreeMap<String, ClientInfo>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            metrics_mechanism: MetricsMechanism::default(),
            protocol: "http".to_string(),
            executor_path: "steward-executor".to_string(),
            executor_timeout_secs: DEFAULT_EXECUTOR_TIMEOUT.as_secs(),
            registry_url: None,
            clients: BTreeMap::new(),
        }
    }
}

impl AgentConfig {
    /// Load the topology from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Parse a YAML topology document. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or an unrecognized metrics mechanism.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(Into::into)
    }

    /// Whether `key` is in the static client table.
    #[must_use]
    pub fn is_known(&self, key: &str) -> bool {
        self.clients.contains_key(key)
    }
}
