//! The identity provider seam.
//!
//! The identity provider is an external collaborator: it issues a bearer
//! token and user identity and notifies on state change. Only the consumed
//! interface is defined here; adapters supply concrete implementations.

use crate::gateway::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserIdentity {
    /// Name to greet the user with: display name, falling back to email,
    /// falling back to the uid.
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Callback invoked when the signed-in user changes (including sign-out,
/// delivered as `None`).
pub type AuthStateCallback = Box<dyn Fn(Option<&UserIdentity>) + Send + Sync>;

/// External identity provider interface.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Interactive sign-in. Returns the authenticated user.
    async fn sign_in(&self) -> Result<UserIdentity>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<()>;

    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserIdentity>;

    /// The current bearer token, if authenticated.
    fn auth_token(&self) -> Option<String>;

    /// Registers a callback for auth state changes.
    fn on_auth_state_changed(&self, callback: AuthStateCallback);
}
