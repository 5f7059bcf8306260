//! Session Layer
//!
//! The two state-owning components. [`GameSession`] owns the game,
//! endpoint and connection containers; [`AuthSession`] owns identity and
//! reaches the game only through a [`GameResetHandle`].

pub mod auth;
pub mod game;

pub use auth::{AuthSession, Session};
pub use game::{
    check_move, GameResetHandle, GameSession, Outcome, PreconditionViolation,
    DEFAULT_DIFFICULTY, DEFAULT_GAME_TYPE,
};
