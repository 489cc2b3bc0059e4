//! The uniform result envelope every steward operation answers with.
//!
//! Lifecycle commands, metrics collection, config reads and health checks all
//! report back in this one shape, so callers can aggregate mixed outcomes
//! without caring which path produced them. All free-text (error messages,
//! raw collector output) rides inside serde-encoded strings, so hostile or
//! broken payloads can never corrupt the surrounding JSON.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Memory usage reading, normalized to whole bytes.
///
/// `Unparseable` marks a figure the collector could not convert; it
/// serializes as `"-1"` so consumers can tell it apart from a genuine zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUsed {
    Bytes(u64),
    Unparseable,
}

impl MemoryUsed {
    /// Wire form: decimal byte count, or `-1` for an unparseable reading.
    #[must_use]
    pub fn as_wire(self) -> String {
        match self {
            MemoryUsed::Bytes(bytes) => bytes.to_string(),
            MemoryUsed::Unparseable => "-1".to_owned(),
        }
    }
}

impl Serialize for MemoryUsed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_wire())
    }
}

impl<'de> Deserialize<'de> for MemoryUsed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let figure = String::deserialize(deserializer)?;
        if figure == "-1" {
            return Ok(MemoryUsed::Unparseable);
        }
        figure
            .parse::<u64>()
            .map(MemoryUsed::Bytes)
            .map_err(|_| serde::de::Error::custom(format!("invalid memory byte count {figure:?}")))
    }
}

/// Telemetry readings carried by a successful metrics envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    /// CPU utilization percentage, already formatted for display.
    pub cpu_used_percent: String,
    pub memory_used: MemoryUsed,
    /// Collector-specific payload, passed through untouched.
    pub raw: Value,
}

/// What happened, before it is stamped with operation, service and executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success,
    MetricsSuccess(MetricsResult),
    /// The message is always non-empty; every producer states what failed.
    Failure(String),
}

impl Outcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure(message.into())
    }
}

/// One operation's result for one service.
///
/// `success == false` always pairs with `error_message`, and a metrics
/// success always pairs with `result`. [`ResultEnvelope::new`] upholds this;
/// prefer it over struct literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub operation: String,
    pub service: String,
    pub executor: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MetricsResult>,
}

impl ResultEnvelope {
    #[must_use]
    pub fn new(operation: &str, service: &str, executor: &str, outcome: Outcome) -> Self {
        let (success, error_message, result) = match outcome {
            Outcome::Success => (true, None, None),
            Outcome::MetricsSuccess(readings) => (true, None, Some(readings)),
            Outcome::Failure(message) => (false, Some(message), None),
        };
        Self {
            operation: operation.to_owned(),
            service: service.to_owned(),
            executor: executor.to_owned(),
            success,
            error_message,
            result,
        }
    }

    /// Envelope rendered as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error only if the `raw` payload cannot be represented as
    /// JSON, which cannot happen for values built by this crate.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
