//! Identity provider port trait.

use crate::domain::error::AscentiaError;

/// Login credentials submitted by a user.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub display_name: String,
    /// Opaque bytes that change whenever the stored credential changes.
    pub credential_fingerprint: Vec<u8>,
}

pub trait IdentityPort {
    /// Fails with `InvalidCredentials` for an unknown user or wrong password.
    fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AscentiaError>;

    fn find(&self, username: &str) -> Option<Identity>;
}
