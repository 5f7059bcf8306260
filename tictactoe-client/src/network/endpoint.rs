//! Endpoint Resolution
//!
//! Computes the API base address from the live endpoint configuration.

use crate::core::config::EndpointConfig;
use crate::core::observable::StateReader;

/// Read-only view of the endpoint config that builds request URLs.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    config: StateReader<EndpointConfig>,
}

impl EndpointResolver {
    /// Resolve against a config container.
    pub fn new(config: StateReader<EndpointConfig>) -> Self {
        Self { config }
    }

    /// Current base address: the proxy path, or `scheme://host:port`.
    pub fn base_url(&self) -> String {
        self.config.snapshot().base_url()
    }

    /// Full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}
