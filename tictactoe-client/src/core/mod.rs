//! Core Primitives
//!
//! State containers, configuration and the error vocabulary shared by the
//! network and session layers.

pub mod config;
pub mod error;
pub mod observable;

pub use config::{ClientConfig, ConfigError, EndpointConfig};
pub use error::{normalize, ClientError, ErrorMessage, SemanticError, TransportError};
pub use observable::{Observable, StateReader};
