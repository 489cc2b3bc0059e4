//! Names that travel in the envelope's `operation` and `executor` fields.

/// Lifecycle and telemetry operations the executor understands.
pub const START: &str = "start";
pub const RESTART: &str = "restart";
pub const STOP: &str = "stop";
pub const METRICS: &str = "metrics";

/// Values for the envelope's `executor` field.
pub mod executor_type {
    /// Produced by the docker-backed command executor.
    pub const DOCKER: &str = "docker";
    /// Produced by querying the service's own telemetry endpoint.
    pub const DIRECT_SERVICE: &str = "direct-service";
    /// Fabricated by the agent when no executor ran at all.
    pub const UNKNOWN: &str = "unknown";
}
