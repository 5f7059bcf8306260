//! # TicTacToe Client
//!
//! Session and game-state synchronization core for the TicTacToe web client.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TICTACTOE CLIENT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── observable.rs - Single-writer state containers          │
//! │  ├── config.rs   - Endpoint and transport configuration      │
//! │  └── error.rs    - Error vocabulary and normalization        │
//! │                                                              │
//! │  network/        - REST plumbing                             │
//! │  ├── transport.rs- HTTP request primitive                    │
//! │  ├── protocol.rs - Wire types and reply parsing              │
//! │  ├── endpoint.rs - Base URL resolution                       │
//! │  └── monitor.rs  - Liveness check                            │
//! │                                                              │
//! │  session/        - State owners                              │
//! │  ├── auth.rs     - Identity (register/login/logout)          │
//! │  └── game.rs     - Game snapshot, proxy switch               │
//! │                                                              │
//! │  client.rs       - Wiring and token hand-off                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Ownership
//!
//! Four process-wide containers, each with exactly one writer:
//! - `Session` - written by `AuthSession`
//! - `Option<GameState>` - written by `GameSession` (and cleared on logout
//!   through a `GameResetHandle`)
//! - `EndpointConfig` - written by `GameSession::toggle_proxy`
//! - `ConnectionStatus` - written by `ConnectionMonitor`
//!
//! Observers hold `StateReader`s and see each write as a single step.
//! Every failure surfaces as an `ErrorMessage` carrying display text.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod client;
pub mod core;
pub mod logging;
pub mod network;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use client::GameClient;
pub use crate::core::config::{ClientConfig, EndpointConfig};
pub use crate::core::error::{ClientError, ErrorMessage, TransportError};
pub use crate::core::observable::StateReader;
pub use network::monitor::ConnectionStatus;
pub use network::protocol::{AuthRequest, AuthResponse, GameState};
pub use session::{Outcome, PreconditionViolation, Session};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
