//! HTTP Transport
//!
//! The request primitive the sessions talk through. Everything above this
//! layer sees parsed JSON or a [`TransportError`]; status codes, timeouts
//! and body decoding are settled here.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::config::ClientConfig;
use crate::core::error::TransportError;

/// JSON-over-HTTP request primitive.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and parse the body as JSON.
    async fn get(&self, url: &str) -> Result<Value, TransportError>;

    /// POST `body` as JSON to `url` and parse the reply as JSON.
    async fn post(&self, url: &str, body: Value) -> Result<Value, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    /// Origin prepended to relative (proxy) URLs.
    origin: String,
}

impl ReqwestTransport {
    /// Build a transport with the given timeout and proxy origin.
    pub fn new(timeout: Duration, origin: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("client setup failed: {}", e)))?;

        Ok(Self {
            client,
            origin: origin.into(),
        })
    }

    /// Build a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(config.request_timeout, config.proxy_origin.clone())
    }

    /// Absolute form of `url`.
    fn absolute(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.origin.trim_end_matches('/'), url)
        } else {
            url.to_string()
        }
    }

    async fn read_reply(response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            warn!("HTTP {} from server", status.as_u16());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        decode_success_body(&bytes)
    }
}

/// Parse a 2xx body. An empty body reads as `null`.
fn decode_success_body(bytes: &[u8]) -> Result<Value, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        let url = self.absolute(url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::read_reply(response).await
    }

    async fn post(&self, url: &str, body: Value) -> Result<Value, TransportError> {
        let url = self.absolute(url);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::read_reply(response).await
    }
}

/// Map reqwest failures to our error type.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if let Some(status) = err.status() {
        TransportError::Status {
            status: status.as_u16(),
            body: None,
        }
    } else if err.is_decode() || err.is_body() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_millis(500), "http://localhost:4200/").unwrap()
    }

    #[test]
    fn test_relative_urls_use_origin() {
        assert_eq!(
            transport().absolute("/api/ping"),
            "http://localhost:4200/api/ping"
        );
    }

    #[test]
    fn test_absolute_urls_untouched() {
        assert_eq!(
            transport().absolute("http://127.0.0.1:50005/ping"),
            "http://127.0.0.1:50005/ping"
        );
    }

    #[test]
    fn test_empty_success_body_is_null() {
        assert_eq!(decode_success_body(b""), Ok(Value::Null));
        assert_eq!(decode_success_body(b" \r\n"), Ok(Value::Null));
    }

    #[test]
    fn test_success_body_parsed() {
        assert_eq!(
            decode_success_body(br#"{"status":"ok"}"#),
            Ok(serde_json::json!({"status": "ok"}))
        );
        assert!(matches!(
            decode_success_body(b"<html>"),
            Err(TransportError::Decode(_))
        ));
    }
}
