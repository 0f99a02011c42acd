//! Bearer-token identity handling.
//!
//! [`AuthSession`] is the shared token store the HTTP gateway reads from.
//! The real identity provider is external; [`StaticIdentity`] is the bundled
//! implementation that takes a pre-issued token (typically from the
//! environment) and feeds it into a session.

use async_trait::async_trait;
use madcap_proto::identity::AuthStateCallback;
use madcap_proto::{GatewayError, IdentityProvider, UserIdentity};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::env;
use std::sync::{Arc, Mutex};

const AUTH_TOKEN_ENV: &str = "MADCAP_AUTH_TOKEN";

#[derive(Default)]
struct AuthState {
    user: Option<UserIdentity>,
    token: Option<String>,
    callbacks: Vec<AuthStateCallback>,
}

/// Shared auth state: the current user, their bearer token, and the
/// registered state-change callbacks.
#[derive(Clone, Default)]
pub struct AuthSession {
    state: Arc<Mutex<AuthState>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a signed-in user and token, notifying registered callbacks.
    pub fn set_signed_in(&self, user: UserIdentity, token: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.user = Some(user.clone());
        state.token = Some(token.into());
        for callback in &state.callbacks {
            callback(Some(&user));
        }
    }

    /// Clears the signed-in user and token, notifying registered callbacks.
    pub fn set_signed_out(&self) {
        let mut state = self.state.lock().unwrap();
        state.user = None;
        state.token = None;
        for callback in &state.callbacks {
            callback(None);
        }
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.state.lock().unwrap().user.clone()
    }

    pub fn auth_token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.user.is_some() && state.token.is_some()
    }

    /// Registers a callback for auth state changes.
    pub fn on_auth_state_changed(&self, callback: AuthStateCallback) {
        self.state.lock().unwrap().callbacks.push(callback);
    }

    /// Builds the headers for an authenticated request.
    ///
    /// Fails when no token is present.
    pub fn auth_headers(&self) -> Result<HeaderMap, GatewayError> {
        let token = self
            .auth_token()
            .ok_or_else(|| GatewayError::Auth("user not authenticated".to_string()))?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GatewayError::Auth("token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

/// Identity provider backed by a pre-issued token.
///
/// Useful for headless runs where the interactive provider is unavailable:
/// the token comes from configuration and sign-in just installs it into the
/// session.
pub struct StaticIdentity {
    session: AuthSession,
    token: String,
    user: UserIdentity,
}

impl StaticIdentity {
    pub fn new(token: impl Into<String>, user: UserIdentity) -> Self {
        Self {
            session: AuthSession::new(),
            token: token.into(),
            user,
        }
    }

    /// Builds an identity from `MADCAP_AUTH_TOKEN`, if set.
    pub fn from_env() -> Option<Self> {
        let _ = dotenvy::dotenv();
        let token = env::var(AUTH_TOKEN_ENV).ok().filter(|t| !t.is_empty())?;
        let user = UserIdentity {
            uid: "token-user".to_string(),
            display_name: None,
            email: None,
        };
        Some(Self::new(token, user))
    }

    /// The session this identity signs in to, for sharing with the gateway.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in(&self) -> Result<UserIdentity, GatewayError> {
        self.session
            .set_signed_in(self.user.clone(), self.token.clone());
        Ok(self.user.clone())
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        self.session.set_signed_out();
        Ok(())
    }

    fn current_user(&self) -> Option<UserIdentity> {
        self.session.current_user()
    }

    fn auth_token(&self) -> Option<String> {
        self.session.auth_token()
    }

    fn on_auth_state_changed(&self, callback: AuthStateCallback) {
        self.session.on_auth_state_changed(callback);
    }
}
