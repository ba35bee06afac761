//! HTTP request handlers for web adapter.

use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::domain::error::AscentiaError;
use crate::ports::identity_port::Credentials;

use super::auth::{Backend, User};
use super::templates::{
    DashboardTemplate, LoginTemplate, ReportTemplate, WatchlistTemplate, render_page,
};
use super::{AppState, WebError, is_htmx_request};

pub type AuthSession = axum_login::AuthSession<Backend>;

const INVALID_LOGIN: &str = "Invalid username or password";

/// Runs a blocking port call off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, WebError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AscentiaError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WebError::internal(format!("worker failed: {e}")))?
        .map_err(WebError::from)
}

fn current_user(auth_session: &AuthSession) -> Result<User, WebError> {
    auth_session
        .user
        .clone()
        .ok_or_else(|| WebError::new(StatusCode::UNAUTHORIZED, "not logged in"))
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct TickerForm {
    pub ticker: String,
}

pub async fn login_form(
    headers: HeaderMap,
    Query(query): Query<NextQuery>,
) -> Result<Response, WebError> {
    let template = LoginTemplate {
        error: None,
        username: "",
        next: safe_next(query.next.as_deref()),
    };
    render_page(&headers, "Login", None, &template)
}

pub async fn login(
    mut auth_session: AuthSession,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let next = safe_next(form.next.as_deref()).to_string();
    let creds = Credentials {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    let username = creds.username.clone();

    let user = match auth_session.authenticate(creds).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            let template = LoginTemplate {
                error: Some(INVALID_LOGIN),
                username: &username,
                next: &next,
            };
            return render_page(&headers, "Login", None, &template);
        }
        Err(e) => return Err(WebError::internal(e.to_string())),
    };

    auth_session
        .login(&user)
        .await
        .map_err(|e| WebError::internal(format!("session error: {e}")))?;

    Ok(Redirect::to(&next).into_response())
}

pub async fn logout(mut auth_session: AuthSession) -> Result<Response, WebError> {
    if let Some(user) = auth_session
        .logout()
        .await
        .map_err(|e| WebError::internal(format!("session error: {e}")))?
    {
        tracing::info!(username = user.username, "logged out");
    }
    Ok(Redirect::to("/login").into_response())
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let (entries, enabled, message) = load_watchlist(&state, &user.username).await;

    let template = DashboardTemplate {
        display_name: &user.display_name,
        provider: state.context.provider_name(),
        entries: &entries,
        enabled,
        message: message.as_deref(),
    };
    render_page(&headers, "Dashboard", Some(&user.display_name), &template)
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    headers: HeaderMap,
    Form(form): Form<TickerForm>,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let htmx = is_htmx_request(&headers);

    let context = Arc::clone(&state.context);
    let report = blocking(move || context.analyze(&form.ticker))
        .await
        .map_err(|e| e.in_fragment(htmx))?;

    let template = ReportTemplate::new(&report, state.context.watchlist_enabled());
    render_page(&headers, &report.ticker, Some(&user.display_name), &template)
}

pub async fn watchlist(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let (entries, enabled, message) = load_watchlist(&state, &user.username).await;

    let template = WatchlistTemplate {
        entries: &entries,
        enabled,
        message: message.as_deref(),
    };
    render_page(&headers, "Watchlist", Some(&user.display_name), &template)
}

pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    headers: HeaderMap,
    Form(form): Form<TickerForm>,
) -> Result<Response, WebError> {
    let user = current_user(&auth_session)?;
    let htmx = is_htmx_request(&headers);

    let context = Arc::clone(&state.context);
    let username = user.username.clone();
    let added = blocking(move || context.add_to_watchlist(&username, &form.ticker))
        .await
        .map_err(|e| e.in_fragment(htmx))?;

    // the row is saved; a failed re-read only degrades the listing
    let (entries, enabled, note) = load_watchlist(&state, &user.username).await;
    let message = match note {
        Some(note) => format!("Added {} to your watchlist ({note})", added.ticker),
        None => format!("Added {} to your watchlist", added.ticker),
    };
    let template = WatchlistTemplate {
        entries: &entries,
        enabled,
        message: Some(&message),
    };
    render_page(&headers, "Watchlist", Some(&user.display_name), &template)
}

/// Entries plus whether the store is usable. A failing store degrades to an
/// empty, disabled list with a note instead of failing the page.
async fn load_watchlist(
    state: &Arc<AppState>,
    username: &str,
) -> (Vec<crate::domain::watchlist::WatchlistEntry>, bool, Option<String>) {
    if !state.context.watchlist_enabled() {
        return (Vec::new(), false, None);
    }

    let context = Arc::clone(&state.context);
    let owner = username.to_string();
    match blocking(move || context.watchlist_for(&owner)).await {
        Ok(entries) => (entries, true, None),
        Err(e) => {
            tracing::error!(username, error = %e.message, "watchlist read failed");
            (Vec::new(), false, Some(e.message))
        }
    }
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
