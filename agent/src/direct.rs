//! Metrics over the direct-service path.
//!
//! Each service exposes its own telemetry snapshot; the agent fetches it,
//! lifts the two headline readings into the envelope, and keeps the full
//! snapshot as the raw block.

use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use steward_common::operation::{METRICS, executor_type};
use steward_common::{MemoryUsed, MetricsResult, Outcome, ResultEnvelope};

use crate::clients::ClientSet;
use crate::registry::Registry;

/// Telemetry snapshot shape served by steward services.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUsage {
    #[serde(default)]
    pub cpu_busy_avg: f64,
    #[serde(default)]
    pub memory: MemoryUsage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    #[serde(default)]
    pub alloc: u64,
    #[serde(default)]
    pub total_alloc: u64,
    /// Bytes obtained from the operating system.
    #[serde(default)]
    pub sys: u64,
}

/// Decode a telemetry snapshot and wrap it as a metrics envelope.
///
/// # Errors
///
/// Fails when the payload is not a valid snapshot.
pub fn normalize_snapshot(service: &str, payload: &str) -> Result<ResultEnvelope> {
    let usage: SystemUsage = serde_json::from_str(payload)
        .map_err(|err| anyhow!("error decoding telemetry snapshot: {err}"))?;
    let raw: Value = serde_json::from_str(payload)
        .map_err(|err| anyhow!("error decoding telemetry snapshot: {err}"))?;
    Ok(ResultEnvelope::new(
        METRICS,
        service,
        executor_type::DIRECT_SERVICE,
        Outcome::MetricsSuccess(MetricsResult {
            cpu_used_percent: format!("{:.2}", usage.cpu_busy_avg),
            memory_used: MemoryUsed::Bytes(usage.memory.sys),
            raw,
        }),
    ))
}

/// Fetch and normalize metrics for one service, resolving its client first.
///
/// # Errors
///
/// Fails when resolution, the fetch, or decoding fails.
pub async fn metrics_via_direct(
    clients: &ClientSet,
    registry: Option<&dyn Registry>,
    service: &str,
) -> Result<ResultEnvelope> {
    let (identity, client) = clients.resolve(service, registry).await?;
    let payload = client.fetch_metrics().await?;
    normalize_snapshot(&identity, &payload)
}
