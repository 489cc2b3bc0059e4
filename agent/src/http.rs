//! HTTP surface of the agent.
//!
//! Thin handlers over `operations`: split the comma-separated service lists,
//! delegate, and answer 200 with per-service outcomes embedded in the body.
//! Partial failure is not an HTTP error.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::Value;

use crate::clients::ClientSet;
use crate::config::AgentConfig;
use crate::executor::ExecutorCommand;
use crate::operations::{self, ConfigReport};
use crate::registry::Registry;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AgentConfig>,
    pub clients: Arc<ClientSet>,
    pub registry: Option<Arc<dyn Registry>>,
    pub executor: Arc<dyn ExecutorCommand>,
}

impl AppState {
    fn registry_ref(&self) -> Option<&dyn Registry> {
        self.registry.as_deref()
    }
}

/// Body of `POST /api/v1/operation`.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub action: String,
    #[serde(default)]
    pub services: Vec<String>,
}

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/ping", get(ping))
        .route("/api/v1/operation", post(operation))
        .route("/api/v1/metrics/{services}", get(metrics))
        .route("/api/v1/config/{services}", get(config))
        .route("/api/v1/health/{services}", get(health))
        .with_state(state)
}

fn split_services(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|service| !service.is_empty())
        .map(ToString::to_string)
        .collect()
}

async fn ping() -> &'static str {
    "pong"
}

async fn operation(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Json<Value> {
    tracing::info!(action = %request.action, services = request.services.len(), "operation requested");
    let results = operations::invoke_operation(
        state.executor.as_ref(),
        &request.action,
        &request.services,
    )
    .await;
    Json(Value::Array(results))
}

async fn metrics(State(state): State<AppState>, Path(services): Path<String>) -> Json<Value> {
    let services = split_services(&services);
    let results = operations::invoke_metrics(
        &state.config,
        &state.clients,
        state.registry_ref(),
        state.executor.as_ref(),
        &services,
    )
    .await;
    Json(Value::Array(results))
}

async fn config(
    State(state): State<AppState>,
    Path(services): Path<String>,
) -> Json<ConfigReport> {
    let report =
        operations::get_config(&state.clients, state.registry_ref(), &split_services(&services))
            .await;
    Json(report)
}

async fn health(
    State(state): State<AppState>,
    Path(services): Path<String>,
) -> Json<BTreeMap<String, Value>> {
    let report =
        operations::get_health(&state.config, state.registry_ref(), &split_services(&services))
            .await;
    Json(report)
}
