//! Client Configuration
//!
//! Endpoint selection and transport tuning. Values come from defaults or
//! from `TTT_*` environment variables.

use std::time::Duration;
use thiserror::Error;

/// Default backend host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default backend port.
pub const DEFAULT_PORT: u16 = 50005;

/// Same-origin path the dev server proxies to the backend.
pub const DEFAULT_PROXY_PATH: &str = "/api";

/// Origin that serves the proxy path.
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:4200";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where API calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// URL scheme for direct mode.
    pub scheme: String,
    /// Backend host for direct mode.
    pub host: String,
    /// Backend port for direct mode.
    pub port: u16,
    /// Route every call through `proxy_path` instead of `host:port`.
    pub use_proxy: bool,
    /// Same-origin proxy prefix.
    pub proxy_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            scheme: "http".into(),
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            use_proxy: false,
            proxy_path: DEFAULT_PROXY_PATH.into(),
        }
    }
}

impl EndpointConfig {
    /// The API base address for this configuration.
    ///
    /// Proxy mode never mentions `host` or `port`.
    pub fn base_url(&self) -> String {
        if self.use_proxy {
            self.proxy_path.trim_end_matches('/').to_string()
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Full client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Initial endpoint selection.
    pub endpoint: EndpointConfig,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Origin that relative (proxy) URLs are resolved against.
    pub proxy_origin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            proxy_origin: DEFAULT_PROXY_ORIGIN.into(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("TTT_HOST") {
            config.endpoint.host = host;
        }
        if let Some(scheme) = lookup("TTT_SCHEME") {
            config.endpoint.scheme = scheme;
        }
        if let Some(port) = lookup("TTT_PORT") {
            config.endpoint.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "TTT_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(flag) = lookup("TTT_USE_PROXY") {
            config.endpoint.use_proxy = flag == "true" || flag == "1";
        }
        if let Some(path) = lookup("TTT_PROXY_PATH") {
            config.endpoint.proxy_path = path;
        }
        if let Some(origin) = lookup("TTT_PROXY_ORIGIN") {
            config.proxy_origin = origin;
        }
        if let Some(secs) = lookup("TTT_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "TTT_REQUEST_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_direct_base_url() {
        let config = EndpointConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:50005");
    }

    #[test]
    fn test_proxy_base_url() {
        let config = EndpointConfig {
            use_proxy: true,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "/api");
    }

    #[test]
    fn test_proxy_path_trailing_slash_trimmed() {
        let config = EndpointConfig {
            use_proxy: true,
            proxy_path: "/backend/".into(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "/backend");
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.endpoint, EndpointConfig::default());
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.proxy_origin, DEFAULT_PROXY_ORIGIN);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TTT_HOST", "game.local"),
            ("TTT_PORT", "8080"),
            ("TTT_USE_PROXY", "1"),
            ("TTT_REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.host, "game.local");
        assert_eq!(config.endpoint.port, 8080);
        assert!(config.endpoint.use_proxy);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = ClientConfig::from_lookup(lookup_from(&[("TTT_PORT", "not-a-port")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { var: "TTT_PORT", .. })
        ));
    }

    proptest! {
        #[test]
        fn proxy_base_url_never_embeds_host_or_port(
            host in "h[a-z0-9]{3,12}\\.test",
            port in 1u16..,
            scheme in "https?",
        ) {
            let config = EndpointConfig {
                scheme,
                host: host.clone(),
                port,
                use_proxy: true,
                proxy_path: DEFAULT_PROXY_PATH.into(),
            };
            let url = config.base_url();
            prop_assert_eq!(url.as_str(), DEFAULT_PROXY_PATH);
            prop_assert!(!url.contains(&host));
            let port_text = format!(":{}", port);
            prop_assert!(!url.contains(&port_text));
        }

        #[test]
        fn direct_base_url_embeds_host_and_port(
            host in "h[a-z0-9]{3,12}\\.test",
            port in 1u16..,
        ) {
            let config = EndpointConfig {
                host: host.clone(),
                port,
                ..Default::default()
            };
            prop_assert_eq!(config.base_url(), format!("http://{}:{}", host, port));
        }
    }
}
