//! Shared test doubles for agent tests.
//!
//! Hand-rolled stubs that count calls and answer canned results, so tests
//! can assert both outcomes and collaborator traffic.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::clients::{ClientFactory, ServiceClient};
use crate::executor::ExecutorCommand;
use crate::registry::{Registry, ServiceEndpoint};

/// Canned `ServiceClient` answering fixed payloads.
#[derive(Debug)]
pub struct StubClient {
    metrics: std::result::Result<String, String>,
    configuration: std::result::Result<String, String>,
}

impl StubClient {
    pub fn new(metrics: &str, configuration: &str) -> Self {
        Self {
            metrics: Ok(metrics.to_string()),
            configuration: Ok(configuration.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            metrics: Err(message.to_string()),
            configuration: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl ServiceClient for StubClient {
    async fn fetch_metrics(&self) -> Result<String> {
        self.metrics.clone().map_err(|message| anyhow::anyhow!(message))
    }

    async fn fetch_configuration(&self) -> Result<String> {
        self.configuration
            .clone()
            .map_err(|message| anyhow::anyhow!(message))
    }
}

/// Client factory that counts constructions and hands out one shared stub.
pub struct CountingFactory {
    count: Arc<AtomicUsize>,
    client: Arc<dyn ServiceClient>,
}

impl Default for CountingFactory {
    fn default() -> Self {
        Self::serving(StubClient::new("{}", "{}"))
    }
}

impl CountingFactory {
    pub fn serving(client: impl ServiceClient + 'static) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            client: Arc::new(client),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn boxed(&self) -> ClientFactory {
        let count = Arc::clone(&self.count);
        let client = Arc::clone(&self.client);
        Box::new(move |_endpoint| {
            count.fetch_add(1, Ordering::SeqCst);
            Arc::clone(&client)
        })
    }
}

/// Scripted `Registry`: canned answers plus call counters.
pub struct StubRegistry {
    available: std::result::Result<(), String>,
    endpoint: std::result::Result<ServiceEndpoint, String>,
    available_calls: AtomicUsize,
    endpoint_calls: AtomicUsize,
}

impl StubRegistry {
    pub fn resolving(endpoint: ServiceEndpoint) -> Self {
        Self {
            available: Ok(()),
            endpoint: Ok(endpoint),
            available_calls: AtomicUsize::new(0),
            endpoint_calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            available: Err(message.to_string()),
            endpoint: Err("not expected".to_string()),
            available_calls: AtomicUsize::new(0),
            endpoint_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_endpoint(message: &str) -> Self {
        Self {
            available: Ok(()),
            endpoint: Err(message.to_string()),
            available_calls: AtomicUsize::new(0),
            endpoint_calls: AtomicUsize::new(0),
        }
    }

    pub fn available_calls(&self) -> usize {
        self.available_calls.load(Ordering::SeqCst)
    }

    pub fn endpoint_calls(&self) -> usize {
        self.endpoint_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for StubRegistry {
    async fn confirm_available(&self, _key: &str) -> Result<()> {
        self.available_calls.fetch_add(1, Ordering::SeqCst);
        self.available
            .clone()
            .map_err(|message| anyhow::anyhow!(message))
    }

    async fn endpoint(&self, _key: &str) -> Result<ServiceEndpoint> {
        self.endpoint_calls.fetch_add(1, Ordering::SeqCst);
        self.endpoint
            .clone()
            .map_err(|message| anyhow::anyhow!(message))
    }
}

/// Scripted `ExecutorCommand` keyed by service name; records every call.
#[derive(Default)]
pub struct StubExecutor {
    responses: HashMap<String, std::result::Result<String, String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubExecutor {
    #[must_use]
    pub fn answering(mut self, service: &str, response: &str) -> Self {
        self.responses
            .insert(service.to_string(), Ok(response.to_string()));
        self
    }

    #[must_use]
    pub fn failing(mut self, service: &str, message: &str) -> Self {
        self.responses
            .insert(service.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ExecutorCommand for StubExecutor {
    async fn call(&self, service: &str, operation: &str) -> Result<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((service.to_string(), operation.to_string()));
        match self.responses.get(service) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!(message.clone())),
            None => anyhow::bail!("not expected"),
        }
    }
}
