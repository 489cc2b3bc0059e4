//! Batch operations behind the HTTP surface.
//!
//! Every dispatcher walks the full requested list; one service's failure
//! never stops the batch, it just becomes that service's entry in the
//! aggregate response.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use steward_common::operation::{METRICS, executor_type};
use steward_common::{Outcome, ResultEnvelope};

use crate::clients::ClientSet;
use crate::config::{AgentConfig, MetricsMechanism};
use crate::direct::metrics_via_direct;
use crate::executor::ExecutorCommand;
use crate::registry::Registry;

/// Executor stdout re-parsed as JSON. Unparseable output degrades to an
/// empty object so one broken response cannot break the aggregate body.
#[must_use]
pub fn process_response(response: &str) -> Value {
    serde_json::from_str(response).unwrap_or_else(|err| {
        tracing::error!(%err, "executor response is not valid JSON");
        Value::Object(Map::new())
    })
}

fn envelope_value(envelope: &ResultEnvelope) -> Value {
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

/// Start, stop or restart every listed service through the executor.
pub async fn invoke_operation(
    executor: &dyn ExecutorCommand,
    operation: &str,
    services: &[String],
) -> Vec<Value> {
    let mut results = Vec::with_capacity(services.len());
    for service in services {
        tracing::debug!(%operation, %service, "invoking executor");
        match executor.call(service, operation).await {
            Ok(response) => results.push(process_response(&response)),
            Err(err) => {
                tracing::error!(%operation, %service, %err, "executor invocation failed");
                results.push(envelope_value(&ResultEnvelope::new(
                    operation,
                    service,
                    executor_type::UNKNOWN,
                    Outcome::failure(err.to_string()),
                )));
            }
        }
    }
    results
}

/// Collect metrics for every listed service via the configured mechanism.
pub async fn invoke_metrics(
    config: &AgentConfig,
    clients: &ClientSet,
    registry: Option<&dyn Registry>,
    executor: &dyn ExecutorCommand,
    services: &[String],
) -> Vec<Value> {
    let mut results = Vec::with_capacity(services.len());
    for service in services {
        let entry = match config.metrics_mechanism {
            MetricsMechanism::DirectService => {
                match metrics_via_direct(clients, registry, service).await {
                    Ok(envelope) => envelope_value(&envelope),
                    Err(err) => {
                        tracing::error!(%service, %err, "direct metrics collection failed");
                        envelope_value(&ResultEnvelope::new(
                            METRICS,
                            service,
                            executor_type::DIRECT_SERVICE,
                            Outcome::failure(err.to_string()),
                        ))
                    }
                }
            }
            MetricsMechanism::Executor => match executor.call(service, METRICS).await {
                Ok(response) => process_response(&response),
                Err(err) => {
                    tracing::error!(%service, %err, "executor metrics collection failed");
                    envelope_value(&ResultEnvelope::new(
                        METRICS,
                        service,
                        executor_type::UNKNOWN,
                        Outcome::failure(err.to_string()),
                    ))
                }
            },
        };
        results.push(entry);
    }
    results
}

/// Aggregated configuration report: one entry per requested service, keyed
/// by the requested name.
#[derive(Debug, PartialEq, Serialize)]
pub struct ConfigReport {
    pub configuration: BTreeMap<String, Value>,
}

/// Read every listed service's configuration through its client.
pub async fn get_config(
    clients: &ClientSet,
    registry: Option<&dyn Registry>,
    services: &[String],
) -> ConfigReport {
    let mut configuration = BTreeMap::new();
    for service in services {
        let entry = match fetch_one_config(clients, registry, service).await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(%service, %err, "configuration fetch failed");
                Value::String(err.to_string())
            }
        };
        configuration.insert(service.clone(), entry);
    }
    ConfigReport { configuration }
}

async fn fetch_one_config(
    clients: &ClientSet,
    registry: Option<&dyn Registry>,
    service: &str,
) -> anyhow::Result<Value> {
    let (_identity, client) = clients.resolve(service, registry).await?;
    let payload = client.fetch_configuration().await?;
    // A payload that is not JSON is still worth reporting verbatim.
    Ok(match serde_json::from_str(&payload) {
        Ok(value) => value,
        Err(_) => Value::String(payload),
    })
}

/// Availability report: `true` or an explanatory string per service.
pub async fn get_health(
    config: &AgentConfig,
    registry: Option<&dyn Registry>,
    services: &[String],
) -> BTreeMap<String, Value> {
    let mut health = BTreeMap::new();
    for service in services {
        if !config.is_known(service) {
            tracing::warn!(%service, "health requested for a service outside the configured clients");
        }
        let entry = match registry {
            None => Value::String("registry not configured; availability unknown".to_string()),
            Some(registry) => match registry.confirm_available(service).await {
                Ok(()) => Value::Bool(true),
                Err(err) => Value::String(err.to_string()),
            },
        };
        health.insert(service.clone(), entry);
    }
    health
}
