//! Service registry boundary.
//!
//! Discovery is delegated to an external registry with exactly two
//! operations: an availability check and an endpoint lookup. Deployments
//! without a registry run with `None`; every caller copes with that.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

/// Network endpoint a registry resolved for a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Canonical identity the registry knows the service by.
    pub service_id: String,
    pub host: String,
    pub port: u16,
}

#[async_trait]
pub trait Registry: Send + Sync {
    /// Confirm the registry currently considers `key` available.
    ///
    /// # Errors
    ///
    /// Fails when the registry cannot be reached, or reports the service
    /// missing or unhealthy.
    async fn confirm_available(&self, key: &str) -> Result<()>;

    /// Resolve the endpoint registered for `key`.
    ///
    /// # Errors
    ///
    /// Fails when the registry cannot be reached or has no usable endpoint.
    async fn endpoint(&self, key: &str) -> Result<ServiceEndpoint>;
}

/// Registry speaking a minimal HTTP protocol:
/// `GET {base}/api/v1/available/{key}` answers 2xx when the service is
/// available, and `GET {base}/api/v1/endpoint/{key}` answers the endpoint
/// as JSON.
pub struct HttpRegistry {
    base: String,
    http: reqwest::Client,
}

impl HttpRegistry {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    async fn confirm_available(&self, key: &str) -> Result<()> {
        let url = format!("{}/api/v1/available/{key}", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach registry at {url}"))?;
        if response.status().is_success() {
            Ok(())
        } else {
            bail!("registry reports {key} unavailable ({})", response.status())
        }
    }

    async fn endpoint(&self, key: &str) -> Result<ServiceEndpoint> {
        let url = format!("{}/api/v1/endpoint/{key}", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach registry at {url}"))?;
        if !response.status().is_success() {
            bail!("registry has no endpoint for {key} ({})", response.status());
        }
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read registry response from {url}"))?;
        serde_json::from_str(&body)
            .with_context(|| format!("failed to decode registry endpoint for {key}"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn endpoint_decodes_from_camel_case_json() {
        let endpoint: ServiceEndpoint = serde_json::from_str(
            r#"{"serviceId":"core-data","host":"10.0.0.5","port":48080}"#,
        )
        .unwrap();
        assert_eq!(endpoint.service_id, "core-data");
        assert_eq!(endpoint.host, "10.0.0.5");
        assert_eq!(endpoint.port, 48080);
    }

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let registry = HttpRegistry::new("http://registry:8500/");
        assert_eq!(registry.base, "http://registry:8500");
    }
}
