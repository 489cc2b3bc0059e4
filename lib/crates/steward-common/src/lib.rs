pub mod envelope;
pub mod operation;

pub use envelope::{MemoryUsed, MetricsResult, Outcome, ResultEnvelope};
