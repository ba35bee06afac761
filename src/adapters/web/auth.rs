//! Authentication backend for axum-login.
//!
//! Delegates to an [`IdentityPort`]; the session auth hash is the identity's
//! credential fingerprint, so changing a password invalidates its sessions.

use axum_login::{AuthUser, AuthnBackend, UserId};
use std::sync::Arc;

use crate::ports::identity_port::{Credentials, Identity, IdentityPort};

/// Authenticated user. The username is the ID.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub username: String,
    pub display_name: String,
    auth_hash: Vec<u8>,
}

impl From<Identity> for User {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.username,
            display_name: identity.display_name,
            auth_hash: identity.credential_fingerprint,
        }
    }
}

impl AuthUser for User {
    type Id = String;

    fn id(&self) -> String {
        self.username.clone()
    }

    fn session_auth_hash(&self) -> &[u8] {
        &self.auth_hash
    }
}

#[derive(Clone)]
pub struct Backend {
    identity: Arc<dyn IdentityPort + Send + Sync>,
}

impl Backend {
    pub fn new(identity: Arc<dyn IdentityPort + Send + Sync>) -> Self {
        Self { identity }
    }
}

impl AuthnBackend for Backend {
    type User = User;
    type Credentials = Credentials;
    type Error = std::convert::Infallible;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let identity = Arc::clone(&self.identity);
        let username = creds.username.clone();

        // argon2 verification is CPU bound
        let outcome = tokio::task::spawn_blocking(move || identity.authenticate(&creds)).await;

        match outcome {
            Ok(Ok(identity)) => {
                tracing::info!(username, "login succeeded");
                Ok(Some(identity.into()))
            }
            Ok(Err(e)) => {
                tracing::warn!(username, error = %e, "login rejected");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(username, error = %e, "credential check panicked");
                Ok(None)
            }
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(self.identity.find(user_id).map(User::from))
    }
}
