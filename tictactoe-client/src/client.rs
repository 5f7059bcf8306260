//! Game Client
//!
//! Wires one transport to a [`GameSession`] and an [`AuthSession`] and
//! plays the caller role between them: it reads the token from the auth
//! session and hands it to game operations.

use std::sync::Arc;

use crate::core::config::{ClientConfig, EndpointConfig};
use crate::core::error::{ErrorMessage, TransportError};
use crate::core::observable::StateReader;
use crate::network::monitor::ConnectionStatus;
use crate::network::protocol::{AuthRequest, AuthResponse, GameState};
use crate::network::transport::{ReqwestTransport, Transport};
use crate::session::auth::{AuthSession, Session};
use crate::session::game::{GameSession, Outcome};

/// Process-wide client state and operations.
pub struct GameClient {
    game: GameSession,
    auth: AuthSession,
}

impl GameClient {
    /// Build a client over an HTTP transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::with_transport(Arc::new(transport), config.endpoint.clone()))
    }

    /// Build a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, endpoint: EndpointConfig) -> Self {
        let game = GameSession::new(transport.clone(), endpoint);
        let auth = AuthSession::new(transport, game.resolver(), game.reset_handle());
        Self { game, auth }
    }

    /// Check backend liveness.
    pub async fn check_connection(&self) -> bool {
        self.game.check_connection().await
    }

    /// Create an account.
    pub async fn register(&self, credentials: &AuthRequest) -> Result<AuthResponse, ErrorMessage> {
        self.auth.register(credentials).await
    }

    /// Log in.
    pub async fn login(&self, credentials: &AuthRequest) -> Result<AuthResponse, ErrorMessage> {
        self.auth.login(credentials).await
    }

    /// Log out; always ends anonymous with no game.
    pub async fn logout(&self) -> Result<(), ErrorMessage> {
        self.auth.logout().await
    }

    /// Start a game with the current session's token.
    pub async fn new_game(&self, game_type: &str, difficulty: i32) -> Result<Outcome, ErrorMessage> {
        let token = self.auth.token();
        self.game
            .start_new_game(token.as_deref(), game_type, difficulty)
            .await
    }

    /// Play a move with the current session's token.
    pub async fn play(&self, row: usize, col: usize) -> Result<Outcome, ErrorMessage> {
        let token = self.auth.token();
        self.game.make_move(token.as_deref(), row, col).await
    }

    /// Drop the current game.
    pub fn reset_game(&self) {
        self.game.reset_game();
    }

    /// Switch proxy mode; returns the new flag.
    pub fn toggle_proxy(&self) -> bool {
        self.game.toggle_proxy()
    }

    /// Identity state.
    pub fn session(&self) -> StateReader<Session> {
        self.auth.session()
    }

    /// Current game.
    pub fn game(&self) -> StateReader<Option<GameState>> {
        self.game.game()
    }

    /// Backend liveness.
    pub fn connection(&self) -> StateReader<ConnectionStatus> {
        self.game.connection()
    }

    /// Endpoint selection.
    pub fn endpoint(&self) -> StateReader<EndpointConfig> {
        self.game.endpoint()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::protocol::{LOGIN_PATH, LOGOUT_PATH, MOVE_PATH, NEW_GAME_PATH, PING_PATH};
    use crate::session::game::{PreconditionViolation, DEFAULT_DIFFICULTY, DEFAULT_GAME_TYPE};
    use crate::testing::MockTransport;
    use serde_json::{json, Value};

    fn game_json(board: [[u8; 3]; 3], result: bool) -> Value {
        json!({
            "board": board,
            "gameType": "TicTacToe",
            "difficulty": 1,
            "token": "tok",
            "result": result
        })
    }

    fn setup() -> (GameClient, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let client = GameClient::with_transport(mock.clone(), EndpointConfig::default());
        (client, mock)
    }

    #[tokio::test]
    async fn test_full_round() {
        let (client, mock) = setup();

        mock.reply(PING_PATH, Ok(json!({"ping": "success"})));
        assert!(client.check_connection().await);
        assert!(client.connection().snapshot().is_online);

        mock.reply(LOGIN_PATH, Ok(json!({"userName": "alice", "token": "tok"})));
        client.login(&AuthRequest::new("alice", "pw")).await.unwrap();

        mock.reply(NEW_GAME_PATH, Ok(game_json([[0; 3]; 3], false)));
        client.new_game(DEFAULT_GAME_TYPE, DEFAULT_DIFFICULTY).await.unwrap();

        mock.reply(MOVE_PATH, Ok(game_json([[1, 0, 0], [0, 2, 0], [0; 3]], false)));
        let outcome = client.play(0, 0).await.unwrap();
        assert!(outcome.is_applied());

        let move_call = &mock.calls_to(MOVE_PATH)[0];
        assert_eq!(move_call.body, Some(json!({"token": "tok", "row": "0", "col": "0"})));

        mock.reply(LOGOUT_PATH, Err(TransportError::Connection("refused".into())));
        assert!(client.logout().await.is_err());
        assert!(!client.session().snapshot().is_logged_in());
        assert_eq!(client.game().snapshot(), None);
    }

    #[tokio::test]
    async fn test_anonymous_caller_sends_nothing() {
        let (client, mock) = setup();

        let outcome = client.new_game(DEFAULT_GAME_TYPE, DEFAULT_DIFFICULTY).await.unwrap();
        assert_eq!(outcome, Outcome::Suppressed(PreconditionViolation::MissingToken));

        let outcome = client.play(0, 0).await.unwrap();
        assert_eq!(outcome, Outcome::Suppressed(PreconditionViolation::MissingToken));

        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_proxy_through_client() {
        let (client, _mock) = setup();

        assert!(client.toggle_proxy());
        assert!(client.endpoint().snapshot().use_proxy);
        assert!(!client.connection().snapshot().is_online);

        client.reset_game();
        assert_eq!(client.game().snapshot(), None);
    }

    #[test]
    fn test_from_config_builds() {
        assert!(GameClient::from_config(&ClientConfig::default()).is_ok());
    }
}
