//! Identity provider backed by the INI config.
//!
//! `[auth] users` lists the accepted usernames; each has a `[user.<name>]`
//! section carrying a display `name` and an argon2 PHC `password_hash`.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::collections::HashMap;

use crate::domain::error::AscentiaError;
use crate::ports::config_port::ConfigPort;
use crate::ports::identity_port::{Credentials, Identity, IdentityPort};

struct UserRecord {
    display_name: String,
    password_hash: String,
}

pub struct ConfigIdentityAdapter {
    users: HashMap<String, UserRecord>,
}

impl ConfigIdentityAdapter {
    /// Loads every listed user. A listed user without a valid hash is a
    /// config error rather than an account nobody can log into.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AscentiaError> {
        let mut users = HashMap::new();
        for username in config.get_list("auth", "users") {
            let section = format!("user.{username}");
            let password_hash = config.get_string(&section, "password_hash").ok_or_else(|| {
                AscentiaError::ConfigMissing {
                    section: section.clone(),
                    key: "password_hash".into(),
                }
            })?;
            PasswordHash::new(&password_hash).map_err(|e| AscentiaError::ConfigInvalid {
                section: section.clone(),
                key: "password_hash".into(),
                reason: e.to_string(),
            })?;

            let display_name = config
                .get_string(&section, "name")
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| username.clone());

            users.insert(
                username,
                UserRecord {
                    display_name,
                    password_hash,
                },
            );
        }

        if users.is_empty() {
            return Err(AscentiaError::ConfigMissing {
                section: "auth".into(),
                key: "users".into(),
            });
        }

        Ok(Self { users })
    }

    fn identity(username: &str, record: &UserRecord) -> Identity {
        Identity {
            username: username.to_string(),
            display_name: record.display_name.clone(),
            credential_fingerprint: record.password_hash.as_bytes().to_vec(),
        }
    }
}

impl IdentityPort for ConfigIdentityAdapter {
    fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AscentiaError> {
        let record = self
            .users
            .get(&credentials.username)
            .ok_or(AscentiaError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|_| AscentiaError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(credentials.password.as_bytes(), &parsed)
            .map_err(|_| AscentiaError::InvalidCredentials)?;

        Ok(Self::identity(&credentials.username, record))
    }

    fn find(&self, username: &str) -> Option<Identity> {
        self.users
            .get(username)
            .map(|record| Self::identity(username, record))
    }
}

/// Argon2id PHC string for a `[user.<name>] password_hash` entry.
pub fn hash_password(password: &str) -> Result<String, AscentiaError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AscentiaError::ConfigInvalid {
            section: "auth".into(),
            key: "password_hash".into(),
            reason: e.to_string(),
        })
}
