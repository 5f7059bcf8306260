//! Auth Session
//!
//! Owns the identity state. Register and login go through the semantic
//! error check; logout always ends anonymous, whatever the server says.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::error::{ClientError, ErrorMessage, TransportError};
use crate::core::observable::{Observable, StateReader};
use crate::network::endpoint::EndpointResolver;
use crate::network::protocol::{
    ApiReply, AuthRequest, AuthResponse, LogoutRequest, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH,
};
use crate::network::transport::Transport;
use crate::session::game::GameResetHandle;

/// Message for a logout with nobody logged in.
pub const NOT_LOGGED_IN: &str = "No user is logged in.";

/// Message for a login reply that passed the error check but has no token.
pub const MISSING_TOKEN: &str = "Login response did not include a token.";

/// Authenticated identity, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody logged in.
    #[default]
    Anonymous,
    /// Logged in with a server-issued token.
    Authenticated {
        /// Account name.
        user: String,
        /// Session token.
        token: String,
        /// Token expiry as reported by the server.
        user_expiry: Option<String>,
    },
}

impl Session {
    /// Logged-in account name.
    pub fn current_user(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user, .. } => Some(user),
        }
    }

    /// Session token.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token, .. } => Some(token),
        }
    }

    /// True exactly when a token is held.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }
}

/// Owner of the [`Session`] container.
pub struct AuthSession {
    transport: Arc<dyn Transport>,
    resolver: EndpointResolver,
    game: GameResetHandle,
    session: Observable<Session>,
}

impl AuthSession {
    /// Create an anonymous session.
    pub fn new(
        transport: Arc<dyn Transport>,
        resolver: EndpointResolver,
        game: GameResetHandle,
    ) -> Self {
        Self {
            transport,
            resolver,
            game,
            session: Observable::default(),
        }
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, credentials), fields(user = %credentials.user_name))]
    pub async fn register(&self, credentials: &AuthRequest) -> Result<AuthResponse, ErrorMessage> {
        let response: AuthResponse = self
            .request(REGISTER_PATH, credentials)
            .await
            .map_err(|e| {
                let msg = ErrorMessage::from(e);
                warn!("Registration failed: {}", msg);
                msg
            })?;

        info!("Registered {}", credentials.user_name);
        Ok(response)
    }

    /// Log in and replace the current session.
    #[instrument(skip(self, credentials), fields(user = %credentials.user_name))]
    pub async fn login(&self, credentials: &AuthRequest) -> Result<AuthResponse, ErrorMessage> {
        let result = self
            .request::<_, AuthResponse>(LOGIN_PATH, credentials)
            .await
            .and_then(|response| match response.token.clone() {
                Some(token) => Ok((response, token)),
                None => Err(ClientError::Message(MISSING_TOKEN.into())),
            });

        let (response, token) = result.map_err(|e| {
            let msg = ErrorMessage::from(e);
            warn!("Login failed: {}", msg);
            msg
        })?;

        let user = response
            .user_name
            .clone()
            .unwrap_or_else(|| credentials.user_name.clone());
        info!("Logged in as {}", user);

        self.session.set(Session::Authenticated {
            user,
            token,
            user_expiry: response.user_expiry.clone(),
        });
        Ok(response)
    }

    /// Log out.
    ///
    /// Local state is cleared and the game reset even when the server call
    /// fails; only the returned result differs.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ErrorMessage> {
        let Some(user) = self.session.get().current_user().map(str::to_string) else {
            self.clear_local_state();
            return Err(ErrorMessage::new(NOT_LOGGED_IN));
        };

        let body = LogoutRequest { user_name: user.clone() };
        let result = self.request::<_, Value>(LOGOUT_PATH, &body).await;

        self.clear_local_state();

        match result {
            Ok(_) => {
                info!("Logged out {}", user);
                Ok(())
            }
            Err(e) => {
                let msg = ErrorMessage::from(e);
                warn!("Logout of {} failed on server: {}", user, msg);
                Err(msg)
            }
        }
    }

    /// Read-only view of the session.
    pub fn session(&self) -> StateReader<Session> {
        self.session.reader()
    }

    /// Current token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.session.get().token().map(str::to_string)
    }

    fn clear_local_state(&self) {
        self.session.set(Session::Anonymous);
        self.game.reset();
    }

    async fn request<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body: Value =
            serde_json::to_value(body).map_err(|e| TransportError::Decode(e.to_string()))?;
        let reply = self.transport.post(&self.resolver.url(path), body).await?;
        ApiReply::parse(reply)?.into_result()
    }
}

// =============================================================================
// TESTS
// =============================================================================
