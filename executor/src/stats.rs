//! `docker stats` invocation and output parsing.
//!
//! The stats line is requested in a three-field `;`-separated format: CPU
//! percentage, memory usage phrase, then a self-describing JSON blob carrying
//! every column. Only the blob may legally contain `;`, which is why field
//! splitting stops after the second separator.

use serde_json::Value;
use steward_common::{MemoryUsed, MetricsResult, Outcome};
use thiserror::Error;

use crate::docker::{ContainerCli, exit_error};

/// Separator between the CPU, memory and raw-blob fields.
const FIELD_SEPARATOR: char = ';';

/// Go template handed to `docker stats --format`.
const STATS_FORMAT: &str = concat!(
    "{{.CPUPerc}};{{.MemUsage}};",
    "{\"cpu_perc\":\"{{.CPUPerc}}\",\"mem_usage\":\"{{.MemUsage}}\",",
    "\"mem_perc\":\"{{.MemPerc}}\",\"net_io\":\"{{.NetIO}}\",",
    "\"block_io\":\"{{.BlockIO}}\",\"pids\":\"{{.PIDs}}\"}"
);

/// Argv for a one-shot stats read of `service`.
#[must_use]
pub fn stats_args(service: &str) -> [&str; 5] {
    ["stats", service, "--no-stream", "--format", STATS_FORMAT]
}

/// Parse failure for a stats line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// The line did not carry all three `;`-separated fields.
    #[error("unexpected stats output: {0:?}")]
    UnexpectedOutput(String),
}

/// Convert a docker memory figure like `1.234GiB` to whole bytes.
///
/// Accepts a bare byte count (`1234`), a figure with a binary unit suffix
/// (`KiB`, `MiB`, `GiB`) or plain `B`. Anything else is `Unparseable`.
#[must_use]
pub fn memory_to_bytes(figure: &str) -> MemoryUsed {
    let unit_start = figure
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(figure.len());
    let (number, unit) = figure.split_at(unit_start);
    let Ok(value) = number.parse::<f64>() else {
        return MemoryUsed::Unparseable;
    };
    let multiplier = match unit {
        "" | "B" => 1.0_f64,
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        _ => return MemoryUsed::Unparseable,
    };
    let bytes = (value * multiplier).round();
    #[allow(clippy::cast_precision_loss)]
    let limit = u64::MAX as f64;
    if !bytes.is_finite() || bytes < 0.0 || bytes > limit {
        return MemoryUsed::Unparseable;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bytes = bytes as u64;
    MemoryUsed::Bytes(bytes)
}

/// Convert one stats line into envelope-ready readings.
///
/// The CPU field loses its `%` suffix, the memory field is reduced to the
/// figure before the first space and converted to bytes, and the raw blob is
/// kept as parsed JSON. A blob that is not valid JSON is preserved as a JSON
/// string so the envelope stays well-formed.
///
/// # Errors
///
/// Fails when the line does not carry all three fields.
pub fn readings_from_line(line: &str) -> Result<MetricsResult, StatsError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.splitn(3, FIELD_SEPARATOR);
    let (Some(cpu), Some(memory), Some(raw)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(StatsError::UnexpectedOutput(line.to_owned()));
    };
    let figure = memory.split(' ').next().unwrap_or_default();
    let raw = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok(MetricsResult {
        cpu_used_percent: cpu.strip_suffix('%').unwrap_or(cpu).to_owned(),
        memory_used: memory_to_bytes(figure),
        raw,
    })
}

/// Collect one metrics reading for `service`.
pub async fn gather_metrics(cli: &impl ContainerCli, service: &str) -> Outcome {
    let output = match cli.run(&stats_args(service)).await {
        Ok(output) if output.status.success() => output,
        Ok(output) => return Outcome::failure(exit_error(&output)),
        Err(err) => return Outcome::failure(err.to_string()),
    };
    let line = String::from_utf8_lossy(&output.stdout);
    match readings_from_line(&line) {
        Ok(readings) => Outcome::MetricsSuccess(readings),
        Err(err) => Outcome::failure(err.to_string()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Conversion never panics, whatever the figure looks like.
        #[test]
        fn prop_memory_conversion_is_total(figure in ".*") {
            let _ = memory_to_bytes(&figure);
        }

        /// Any digits-and-dot figure with a known unit converts to bytes.
        #[test]
        fn prop_known_units_convert(
            value in 0.0_f64..4096.0,
            unit in prop_oneof![Just("B"), Just("KiB"), Just("MiB"), Just("GiB")],
        ) {
            let figure = format!("{value:.3}{unit}");
            prop_assert!(matches!(memory_to_bytes(&figure), MemoryUsed::Bytes(_)));
        }

        /// Line parsing never panics and fails only on missing separators.
        #[test]
        fn prop_line_parsing_is_total(line in ".*") {
            let stripped = line.trim_end_matches(['\r', '\n']);
            let separators = stripped.matches(FIELD_SEPARATOR).count();
            match readings_from_line(&line) {
                Ok(_) => prop_assert!(separators >= 2),
                Err(StatsError::UnexpectedOutput(_)) => prop_assert!(separators < 2),
            }
        }
    }
}
