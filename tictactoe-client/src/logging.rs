//! Logging setup.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// A global subscriber was already installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingError(String);

/// Install a fmt subscriber. `RUST_LOG` overrides `default_level`.
pub fn init(default_level: Level) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // The first call may lose to another test's subscriber; the second
        // one always fails.
        let _ = init(Level::DEBUG);
        assert!(init(Level::DEBUG).is_err());
    }
}
