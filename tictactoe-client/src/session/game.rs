//! Game Session
//!
//! Owns the current [`GameState`] snapshot, the endpoint configuration and
//! the connection monitor. The server is authoritative: every successful
//! reply replaces the snapshot wholesale, and failures leave it untouched.
//!
//! Tokens are passed in by the caller. This component never looks at the
//! auth session, which keeps ownership one-directional.
//!
//! Overlapping requests are not sequenced: if two moves are in flight, the
//! reply that arrives last overwrites the snapshot regardless of issue
//! order.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::core::config::EndpointConfig;
use crate::core::error::{ClientError, ErrorMessage, TransportError};
use crate::core::observable::{Observable, StateReader};
use crate::network::endpoint::EndpointResolver;
use crate::network::monitor::{ConnectionMonitor, ConnectionStatus};
use crate::network::protocol::{
    ApiReply, GameState, MoveRequest, NewGameRequest, BOARD_SIZE, EMPTY_CELL, MOVE_PATH,
    NEW_GAME_PATH,
};
use crate::network::transport::Transport;

/// Game variant the backend plays.
pub const DEFAULT_GAME_TYPE: &str = "TicTacToe";

/// Default opponent strength.
pub const DEFAULT_DIFFICULTY: i32 = 1;

/// Why a guarded operation was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionViolation {
    /// Caller has no session token.
    MissingToken,
    /// No game has been started.
    NoActiveGame,
    /// The current game already has a result.
    GameOver,
    /// Target cell is not empty.
    CellOccupied {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },
    /// Target cell is off the board.
    OutOfBounds {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },
}

/// Result of a guarded game operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request succeeded; this is the new snapshot.
    Applied(GameState),
    /// Guard rejected the call locally; nothing was sent.
    Suppressed(PreconditionViolation),
}

impl Outcome {
    /// Whether a request reached the server and was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Call-site guard for a move against the current snapshot.
pub fn check_move(
    snapshot: Option<&GameState>,
    token: Option<&str>,
    row: usize,
    col: usize,
) -> Result<MoveRequest, PreconditionViolation> {
    let token = token.ok_or(PreconditionViolation::MissingToken)?;
    let game = snapshot.ok_or(PreconditionViolation::NoActiveGame)?;

    if game.is_finished() {
        return Err(PreconditionViolation::GameOver);
    }
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return Err(PreconditionViolation::OutOfBounds { row, col });
    }
    if game.cell(row, col) != Some(EMPTY_CELL) {
        return Err(PreconditionViolation::CellOccupied { row, col });
    }

    Ok(MoveRequest::new(token, row, col))
}

/// Handle that can only clear the game snapshot.
///
/// Given to the auth session so logout can reset the game without holding
/// the game session itself.
#[derive(Clone)]
pub struct GameResetHandle {
    game: Arc<Observable<Option<GameState>>>,
}

impl GameResetHandle {
    /// Clear the snapshot.
    pub fn reset(&self) {
        self.game.set(None);
    }
}

/// Owner of the game, endpoint and connection containers.
pub struct GameSession {
    transport: Arc<dyn Transport>,
    endpoint: Observable<EndpointConfig>,
    resolver: EndpointResolver,
    monitor: ConnectionMonitor,
    game: Arc<Observable<Option<GameState>>>,
}

impl GameSession {
    /// Create a session with no active game.
    pub fn new(transport: Arc<dyn Transport>, endpoint: EndpointConfig) -> Self {
        let endpoint = Observable::new(endpoint);
        let resolver = EndpointResolver::new(endpoint.reader());
        let monitor = ConnectionMonitor::new(transport.clone(), resolver.clone());

        Self {
            transport,
            endpoint,
            resolver,
            monitor,
            game: Arc::new(Observable::new(None)),
        }
    }

    /// Start a new game. Without a token nothing is sent.
    #[instrument(skip(self, token))]
    pub async fn start_new_game(
        &self,
        token: Option<&str>,
        game_type: &str,
        difficulty: i32,
    ) -> Result<Outcome, ErrorMessage> {
        let Some(token) = token else {
            debug!("New game suppressed: no token");
            return Ok(Outcome::Suppressed(PreconditionViolation::MissingToken));
        };

        let request = NewGameRequest {
            token: token.to_string(),
            game_type: game_type.to_string(),
            difficulty,
        };

        let state = self.request_game(NEW_GAME_PATH, &request).await.map_err(|e| {
            let msg = ErrorMessage::from(e);
            warn!("New game failed: {}", msg);
            msg
        })?;

        info!("New {} game started (difficulty {})", state.game_type, state.difficulty);
        self.game.set(Some(state.clone()));
        Ok(Outcome::Applied(state))
    }

    /// Play a move at `(row, col)`.
    ///
    /// Moves on an occupied cell, on a finished or missing game, or without
    /// a token are dropped locally.
    #[instrument(skip(self, token))]
    pub async fn make_move(
        &self,
        token: Option<&str>,
        row: usize,
        col: usize,
    ) -> Result<Outcome, ErrorMessage> {
        let snapshot = self.game.get();
        let request = match check_move(snapshot.as_ref(), token, row, col) {
            Ok(request) => request,
            Err(violation) => {
                debug!("Move suppressed: {:?}", violation);
                return Ok(Outcome::Suppressed(violation));
            }
        };

        let state = self.request_game(MOVE_PATH, &request).await.map_err(|e| {
            let msg = ErrorMessage::from(e);
            warn!("Move ({}, {}) failed: {}", row, col, msg);
            msg
        })?;

        if state.is_finished() {
            info!("Game finished");
        }
        self.game.set(Some(state.clone()));
        Ok(Outcome::Applied(state))
    }

    /// Drop the current game. No network call.
    pub fn reset_game(&self) {
        self.game.set(None);
    }

    /// Switch between proxy and direct mode.
    ///
    /// Liveness and game snapshots may belong to a different backend, so
    /// both are cleared. Returns the new proxy flag.
    pub fn toggle_proxy(&self) -> bool {
        self.endpoint.update(|c| c.use_proxy = !c.use_proxy);
        self.monitor.invalidate();
        self.game.set(None);

        let use_proxy = self.endpoint.get().use_proxy;
        info!("Proxy mode {}", if use_proxy { "enabled" } else { "disabled" });
        use_proxy
    }

    /// Check backend liveness.
    pub async fn check_connection(&self) -> bool {
        self.monitor.check_connection().await
    }

    /// Resolver bound to this session's endpoint config.
    pub fn resolver(&self) -> EndpointResolver {
        self.resolver.clone()
    }

    /// Handle that can clear the game.
    pub fn reset_handle(&self) -> GameResetHandle {
        GameResetHandle {
            game: self.game.clone(),
        }
    }

    /// Read-only view of the game.
    pub fn game(&self) -> StateReader<Option<GameState>> {
        self.game.reader()
    }

    /// Read-only view of the endpoint config.
    pub fn endpoint(&self) -> StateReader<EndpointConfig> {
        self.endpoint.reader()
    }

    /// Read-only view of backend liveness.
    pub fn connection(&self) -> StateReader<ConnectionStatus> {
        self.monitor.status()
    }

    async fn request_game<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<GameState, ClientError> {
        let body: Value =
            serde_json::to_value(body).map_err(|e| TransportError::Decode(e.to_string()))?;
        let reply = self.transport.post(&self.resolver.url(path), body).await?;
        ApiReply::parse_game(reply)?.into_result()
    }
}

// =============================================================================
// TESTS
// =============================================================================
