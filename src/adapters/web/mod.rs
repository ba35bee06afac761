//! Web server adapter.
//!
//! Axum server with an HTMX frontend for analyzing tickers and managing a
//! per-user watchlist. Sessions live in memory and are signed with
//! `[auth] session_secret`.

mod auth;
mod error;
mod handlers;
mod templates;

pub use auth::{Backend, User};
pub use error::{ERROR_TARGET, WebError};
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use axum_login::{AuthManagerLayerBuilder, login_required};
use rand::RngCore;
use rand::rngs::OsRng;
use std::sync::Arc;
use time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::context::AppContext;
use crate::domain::error::AscentiaError;
use crate::ports::config_port::ConfigPort;
use crate::ports::identity_port::IdentityPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 86_400;
pub const DEFAULT_STATIC_DIR: &str = "static";
const SESSION_KEY_BYTES: usize = 64;

pub struct AppState {
    pub context: Arc<AppContext>,
    pub identity: Arc<dyn IdentityPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

/// Cookie signing key from 128 hex chars. Without one a random key is used
/// and sessions do not survive a restart.
pub fn session_key(config: &dyn ConfigPort) -> Result<Key, AscentiaError> {
    let Some(secret) = config.get_string("auth", "session_secret") else {
        tracing::warn!("no [auth] session_secret configured, using an ephemeral key");
        let mut bytes = [0u8; SESSION_KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        return Ok(Key::from(&bytes));
    };

    let invalid = |reason: String| AscentiaError::ConfigInvalid {
        section: "auth".into(),
        key: "session_secret".into(),
        reason,
    };
    let bytes = hex::decode(secret.trim()).map_err(|e| invalid(e.to_string()))?;
    if bytes.len() < SESSION_KEY_BYTES {
        return Err(invalid(format!(
            "need {} hex chars, got {}",
            SESSION_KEY_BYTES * 2,
            secret.trim().len()
        )));
    }
    Ok(Key::from(&bytes))
}

pub fn build_router(state: AppState) -> Result<Router, AscentiaError> {
    let key = session_key(state.config.as_ref())?;
    let lifetime = state
        .config
        .get_int("auth", "session_lifetime", DEFAULT_SESSION_LIFETIME_SECS)
        .max(60);
    let static_dir = state
        .config
        .get_string("web", "static_dir")
        .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());
    // only set behind TLS, browsers drop Secure cookies over plain http
    let secure_cookies = state.config.get_bool("web", "secure_cookies", false);

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(lifetime)))
        .with_signed(key);
    let backend = Backend::new(Arc::clone(&state.identity));
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let protected = Router::new()
        .route("/", get(handlers::dashboard))
        .route("/analyze", post(handlers::analyze))
        .route(
            "/watchlist",
            get(handlers::watchlist).post(handlers::add_to_watchlist),
        )
        .route_layer(login_required!(Backend, login_url = "/login"));

    Ok(Router::new()
        .merge(protected)
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::not_found)
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state)))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
