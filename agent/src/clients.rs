//! Service clients and the lazily populated client cache.
//!
//! Statically configured services get their clients preloaded at startup.
//! Anything else is resolved through the registry on first use: availability
//! check, endpoint lookup, client construction, then the cache keeps the
//! client under the registry's canonical id plus the requested alias when
//! the two differ. A cached key never touches the registry again.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::registry::Registry;

/// Path prefix every steward service serves its API under.
pub const API_BASE: &str = "/api/v1";
/// Telemetry route below [`API_BASE`].
const METRICS_ROUTE: &str = "/metrics";
/// Configuration route below [`API_BASE`].
const CONFIG_ROUTE: &str = "/config";

/// Address a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEndpoint {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    /// Base path of the service's API, normally [`API_BASE`].
    pub path: String,
}

impl ClientEndpoint {
    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}{}", self.protocol, self.host, self.port, self.path)
    }
}

/// One remote service's API, reduced to the two reads the agent makes.
#[async_trait]
pub trait ServiceClient: Send + Sync + std::fmt::Debug {
    /// Fetch the service's telemetry snapshot as JSON text.
    ///
    /// # Errors
    ///
    /// Fails when the service cannot be reached or answers non-2xx.
    async fn fetch_metrics(&self) -> Result<String>;

    /// Fetch the service's current configuration as JSON text.
    ///
    /// # Errors
    ///
    /// Fails when the service cannot be reached or answers non-2xx.
    async fn fetch_configuration(&self) -> Result<String>;
}

/// Production client over a service's HTTP API.
#[derive(Debug)]
pub struct HttpServiceClient {
    base: String,
    http: reqwest::Client,
}

impl HttpServiceClient {
    #[must_use]
    pub fn new(endpoint: &ClientEndpoint) -> Self {
        Self {
            base: endpoint.base_url(),
            http: reqwest::Client::new(),
        }
    }

    async fn get_text(&self, route: &str) -> Result<String> {
        let url = format!("{}{route}", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("{url} answered {status}");
        }
        response
            .text()
            .await
            .with_context(|| format!("failed to read body from {url}"))
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    async fn fetch_metrics(&self) -> Result<String> {
        self.get_text(METRICS_ROUTE).await
    }

    async fn fetch_configuration(&self) -> Result<String> {
        self.get_text(CONFIG_ROUTE).await
    }
}

/// Builds a client for an endpoint; swapped out by tests.
pub type ClientFactory = Box<dyn Fn(&ClientEndpoint) -> Arc<dyn ServiceClient> + Send + Sync>;

/// Lazily populated client cache keyed by service identity.
pub struct ClientSet {
    protocol: String,
    factory: ClientFactory,
    clients: RwLock<HashMap<String, Arc<dyn ServiceClient>>>,
}

impl ClientSet {
    #[must_use]
    pub fn new(protocol: &str) -> Self {
        Self::with_factory(
            protocol,
            Box::new(|endpoint| Arc::new(HttpServiceClient::new(endpoint))),
        )
    }

    #[must_use]
    pub fn with_factory(protocol: &str, factory: ClientFactory) -> Self {
        Self {
            protocol: protocol.to_string(),
            factory,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Register a client for a statically configured service.
    pub async fn preload(&self, key: &str, host: &str, port: u16) {
        let endpoint = ClientEndpoint {
            protocol: self.protocol.clone(),
            host: host.to_string(),
            port,
            path: API_BASE.to_string(),
        };
        let client = (self.factory)(&endpoint);
        self.clients.write().await.insert(key.to_string(), client);
    }

    pub async fn get(&self, key: &str) -> Option<Arc<dyn ServiceClient>> {
        self.clients.read().await.get(key).cloned()
    }

    /// Hand back a client for `key`, consulting the registry only when the
    /// key is not already cached. Returns the identity the client is cached
    /// under alongside the client itself.
    ///
    /// # Errors
    ///
    /// Fails when the key is unknown and no registry is configured, when the
    /// registry reports the service unavailable, or when the endpoint lookup
    /// fails.
    pub async fn resolve(
        &self,
        key: &str,
        registry: Option<&dyn Registry>,
    ) -> Result<(String, Arc<dyn ServiceClient>)> {
        if let Some(client) = self.get(key).await {
            return Ok((key.to_owned(), client));
        }
        let Some(registry) = registry else {
            bail!("unknown service {key} and no registry is configured to resolve it");
        };
        tracing::info!(
            service = %key,
            "service not among the configured clients; consulting the registry",
        );
        registry.confirm_available(key).await?;
        let endpoint = registry.endpoint(key).await.map_err(|err| {
            anyhow::anyhow!("on attempting to get endpoint for service {key}: {err}")
        })?;
        let client = (self.factory)(&ClientEndpoint {
            protocol: self.protocol.clone(),
            host: endpoint.host.clone(),
            port: endpoint.port,
            path: API_BASE.to_string(),
        });
        let mut clients = self.clients.write().await;
        clients.insert(endpoint.service_id.clone(), Arc::clone(&client));
        if endpoint.service_id != key {
            clients.insert(key.to_owned(), Arc::clone(&client));
        }
        tracing::info!(
            service = %key,
            id = %endpoint.service_id,
            host = %endpoint.host,
            port = endpoint.port,
            "client constructed from registry endpoint",
        );
        Ok((endpoint.service_id, client))
    }
}
