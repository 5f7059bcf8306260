//! Protocol Messages
//!
//! Wire format for the REST API. Bodies are JSON with camelCase field
//! names. Every reply is parsed at this boundary into an [`ApiReply`], so
//! callers never inspect raw payloads for error fields.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{is_truthy, ClientError, SemanticError, TransportError};

// =============================================================================
// PATHS
// =============================================================================

/// Liveness check.
pub const PING_PATH: &str = "/ping";
/// Account creation.
pub const REGISTER_PATH: &str = "/users/register";
/// Login.
pub const LOGIN_PATH: &str = "/users/login";
/// Logout.
pub const LOGOUT_PATH: &str = "/users/logout";
/// Start a game.
pub const NEW_GAME_PATH: &str = "/game/new";
/// Play a move.
pub const MOVE_PATH: &str = "/game/move";

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// Credentials for register and login.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Account name.
    pub user_name: String,
    /// Plain password, sent as-is.
    pub password: String,
}

impl AuthRequest {
    /// Build credentials.
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Logout body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// User being logged out.
    pub user_name: String,
}

/// Start-game body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    /// Session token.
    pub token: String,
    /// Game variant, e.g. `"TicTacToe"`.
    pub game_type: String,
    /// Opponent strength.
    pub difficulty: i32,
}

/// Move body. Coordinates travel as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveRequest {
    /// Session token.
    pub token: String,
    /// Row, `"0"`..=`"2"`.
    pub row: String,
    /// Column, `"0"`..=`"2"`.
    pub col: String,
}

impl MoveRequest {
    /// Encode a move at `(row, col)`.
    pub fn new(token: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            token: token.into(),
            row: row.to_string(),
            col: col.to_string(),
        }
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Register/login reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Canonical account name.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Session token.
    #[serde(default)]
    pub token: Option<String>,
    /// Token expiry as sent by the server.
    #[serde(default)]
    pub user_expiry: Option<String>,
}

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// Cell values: 0 empty, 1 and 2 the two players.
pub type Board = [[u8; BOARD_SIZE]; BOARD_SIZE];

/// Empty cell marker.
pub const EMPTY_CELL: u8 = 0;

/// Snapshot of one game as last reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Board cells, row-major.
    pub board: Board,
    /// Game variant.
    pub game_type: String,
    /// Opponent strength.
    pub difficulty: i32,
    /// Token the game is bound to.
    pub token: String,
    /// True once the game has ended.
    pub result: bool,
}

impl GameState {
    /// Cell value, or `None` outside the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        self.board.get(row)?.get(col).copied()
    }

    /// Whether the game has ended.
    pub fn is_finished(&self) -> bool {
        self.result
    }

    /// Reject boards holding values other than 0, 1 or 2.
    fn validate(&self) -> Result<(), TransportError> {
        let bad = self.board.iter().flatten().find(|&&v| v > 2);
        match bad {
            Some(v) => Err(TransportError::Decode(format!("invalid cell value {}", v))),
            None => Ok(()),
        }
    }
}

// =============================================================================
// REPLY PARSING
// =============================================================================

/// A 2xx reply: either the expected payload or an embedded error.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    /// Expected payload.
    Ok(T),
    /// `{error, error_description?}` delivered with a success status.
    SemanticError(SemanticError),
}

impl<T: DeserializeOwned> ApiReply<T> {
    /// Classify and decode a reply body.
    pub fn parse(value: Value) -> Result<Self, TransportError> {
        if let Some(err) = semantic_error(&value) {
            return Ok(Self::SemanticError(err));
        }
        serde_json::from_value(value)
            .map(Self::Ok)
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl<T> ApiReply<T> {
    /// Collapse into a `Result`.
    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            Self::Ok(payload) => Ok(payload),
            Self::SemanticError(err) => Err(ClientError::Semantic(err)),
        }
    }
}

impl ApiReply<GameState> {
    /// Parse a game reply and check the board.
    pub fn parse_game(value: Value) -> Result<Self, TransportError> {
        let reply = Self::parse(value)?;
        if let Self::Ok(state) = &reply {
            state.validate()?;
        }
        Ok(reply)
    }
}

/// Extract an embedded error marker, if the payload carries one.
fn semantic_error(value: &Value) -> Option<SemanticError> {
    let marker = value.get("error").filter(|v| is_truthy(v))?;
    let code = match marker {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let description = value
        .get("error_description")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some(SemanticError { code, description })
}

/// Outcome of a ping reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Reply carries a recognized marker.
    Alive,
    /// Reply parsed but matched no known shape.
    Unrecognized,
}

impl Liveness {
    /// Classify a ping reply. Accepts `{ping: "success"}`, any reply with a
    /// `userName`, or `{status: "ok"}`.
    pub fn from_reply(value: &Value) -> Self {
        let ping_ok = value.get("ping").and_then(Value::as_str) == Some("success");
        let has_identity = value.get("userName").is_some_and(|v| !v.is_null());
        let status_ok = value.get("status").and_then(Value::as_str) == Some("ok");

        if ping_ok || has_identity || status_ok {
            Self::Alive
        } else {
            Self::Unrecognized
        }
    }

    /// Whether the server counts as online.
    pub fn is_alive(self) -> bool {
        self == Self::Alive
    }
}

// =============================================================================
// TESTS
// =============================================================================
