//! Argv-level dispatch for the executor binary.
//!
//! Every invocation, valid or not, resolves to exactly one [`ResultEnvelope`]
//! so the caller can always parse stdout. Failures are data inside the
//! envelope, never a nonzero exit of the executor itself.

use steward_common::operation::{self, executor_type};
use steward_common::{Outcome, ResultEnvelope};

use crate::catalog::ServiceCatalog;
use crate::commands::run_lifecycle;
use crate::docker::ContainerCli;
use crate::stats::gather_metrics;

const FAILED_START_PREFIX: &str = "Error starting service";
const FAILED_RESTART_PREFIX: &str = "Error restarting service";
const FAILED_STOP_PREFIX: &str = "Error stopping service";

/// Dispatch one executor invocation.
///
/// `args` is the full argv: `<program> <service> <operation>`. Service keys
/// outside `catalog` and operations outside start/stop/restart/metrics are
/// rejected without touching docker.
pub async fn execute(
    args: &[String],
    catalog: &ServiceCatalog,
    cli: &impl ContainerCli,
) -> ResultEnvelope {
    let program = args.first().map_or("steward-executor", String::as_str);
    let (Some(service), Some(op)) = (args.get(1), args.get(2)) else {
        return ResultEnvelope::new(
            "",
            "",
            executor_type::DOCKER,
            Outcome::failure(format!("usage: {program} <service> <operation>")),
        );
    };

    if !catalog.is_known(service) {
        return ResultEnvelope::new(
            "",
            service,
            executor_type::DOCKER,
            Outcome::failure("Specified service is unknown"),
        );
    }

    let outcome = match op.as_str() {
        operation::START => run_lifecycle(cli, op, service, FAILED_START_PREFIX, true).await,
        operation::RESTART => run_lifecycle(cli, op, service, FAILED_RESTART_PREFIX, true).await,
        operation::STOP => run_lifecycle(cli, op, service, FAILED_STOP_PREFIX, false).await,
        operation::METRICS => gather_metrics(cli, service).await,
        _ => Outcome::failure("operation not supported by executor"),
    };
    ResultEnvelope::new(op, service, executor_type::DOCKER, outcome)
}
