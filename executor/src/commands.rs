//! Lifecycle commands with post-state verification.
//!
//! Acting on a container is never trusted on its own: after
//! `docker <operation> <service>` exits cleanly, the container is inspected
//! and its observed running flag must match what the operation promised.
//! Only then does the command count as a success.

use anyhow::{Result, bail};
use serde::Deserialize;
use steward_common::Outcome;

use crate::docker::{ContainerCli, exit_error, flatten_output};

pub(crate) const INSPECT: &str = "inspect";

/// Subset of a `docker inspect` record the verifier cares about.
#[derive(Debug, Deserialize)]
struct ContainerRecord {
    #[serde(rename = "State")]
    state: RunState,
}

#[derive(Debug, Deserialize)]
struct RunState {
    #[serde(rename = "Running")]
    running: bool,
}

/// Run one lifecycle operation and verify the container landed in the state
/// it promises. `should_run` is that promised state.
pub async fn run_lifecycle(
    cli: &impl ContainerCli,
    operation: &str,
    service: &str,
    prefix: &str,
    should_run: bool,
) -> Outcome {
    match cli.run(&[operation, service]).await {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            let flat = flatten_output(&output);
            return if flat.is_empty() {
                Outcome::failure(format!("{prefix}: {}", output.status))
            } else {
                Outcome::failure(format!("{prefix}: {} ({flat})", output.status))
            };
        }
        Err(err) => return Outcome::failure(format!("{prefix}: {err}")),
    }

    match inspect_running(cli, service).await {
        Ok(running) if running == should_run => Outcome::Success,
        Ok(true) => Outcome::failure(format!("{prefix}: service is running but shouldn't be")),
        Ok(false) => Outcome::failure(format!("{prefix}: service is not running but should be")),
        Err(err) => Outcome::failure(format!("{prefix}: {err}")),
    }
}

/// Observed running flag for exactly one container named `service`.
async fn inspect_running(cli: &impl ContainerCli, service: &str) -> Result<bool> {
    let output = cli.run(&[INSPECT, service]).await?;
    if !output.status.success() {
        bail!("{}", exit_error(&output));
    }
    let records: Vec<ContainerRecord> = serde_json::from_slice(&output.stdout)?;
    match records.as_slice() {
        [] => bail!("container {service} not found"),
        [record] => Ok(record.state.running),
        [..] => bail!("multiple containers found with name {service}"),
    }
}
