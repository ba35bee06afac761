#![cfg(feature = "web")]
//! Auth flow integration tests.
//!
//! Tests cover:
//! - Login with correct credentials succeeds (redirect to /)
//! - Login with wrong credentials fails (re-renders with error)
//! - Accessing protected routes without session redirects to /login
//! - Logout destroys session (subsequent access redirects)
//! - Sessions are per user

mod common;

use ascentia::adapters::config_identity_adapter::ConfigIdentityAdapter;
use ascentia::adapters::web::{AppState, build_router};
use ascentia::context::AppContext;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::{Arc, LazyLock};
use tower::ServiceExt;

use common::*;

const ALICE_PASSWORD: &str = "alicepass123";
const BOB_PASSWORD: &str = "bobpass456";

fn hash(password: &str, salt: &str) -> String {
    use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version, password_hash::SaltString};
    let salt = SaltString::from_b64(salt).unwrap();
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

static ALICE_HASH: LazyLock<String> = LazyLock::new(|| hash(ALICE_PASSWORD, "YWxpY2VzYWx0YWxpY2U"));
static BOB_HASH: LazyLock<String> = LazyLock::new(|| hash(BOB_PASSWORD, "Ym9ic2FsdGJvYnNhbHQ"));

fn auth_config() -> MapConfig {
    MapConfig::new()
        .with("auth", "users", "alice, bob")
        .with("auth", "session_secret", &"0a".repeat(64))
        .with("auth", "session_lifetime", "86400")
        .with("user.alice", "name", "Alice")
        .with("user.alice", "password_hash", &ALICE_HASH)
        .with("user.bob", "name", "Bob")
        .with("user.bob", "password_hash", &BOB_HASH)
}

fn create_auth_app() -> Router {
    create_auth_app_with(auth_config())
}

fn create_auth_app_with(config: MapConfig) -> Router {
    let context = AppContext::new(
        Arc::new(bhp_market()),
        Some(Arc::new(InMemoryWatchlist::new())),
    );
    let state = AppState {
        context: Arc::new(context),
        identity: Arc::new(ConfigIdentityAdapter::from_config(&config).unwrap()),
        config: Arc::new(config),
    };
    build_router(state).unwrap()
}

fn extract_cookies(response: &axum::http::Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

fn build_cookie_header(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .map(|sc| sc.split(';').next().unwrap_or("").to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    let form_data = format!("username={}&password={}", username, password);
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_data))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::http::Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(response: axum::http::Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).into_owned()
}

async fn login_cookie(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(login_request(username, password))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    build_cookie_header(&extract_cookies(&response))
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn unauthenticated_access_redirects_to_login() {
        let app = create_auth_app();

        for uri in ["/", "/watchlist"] {
            let response = app.clone().oneshot(get(uri, None)).await.unwrap();

            // login_required! returns 307 Temporary Redirect with ?next= query param
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            let location = location(&response);
            assert!(
                location.starts_with("/login"),
                "should redirect to /login, got: {location}"
            );
            assert!(location.contains("next="), "got: {location}");
        }
    }

    #[tokio::test]
    async fn unauthenticated_analyze_is_redirected() {
        let app = create_auth_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("ticker=BHP.AX"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn login_page_accessible_without_auth() {
        let app = create_auth_app();

        let response = app.oneshot(get("/login?next=/watchlist", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Login"));
        assert!(html.contains("value=\"/watchlist\"") || html.contains("value=\"&#x2f;watchlist\""));
    }

    #[tokio::test]
    async fn login_with_correct_credentials_redirects_to_dashboard() {
        let app = create_auth_app();

        let response = app
            .oneshot(login_request("alice", ALICE_PASSWORD))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let cookies = extract_cookies(&response);
        assert!(!cookies.is_empty(), "login should set a session cookie");
    }

    #[tokio::test]
    async fn session_cookie_is_plain_by_default() {
        let app = create_auth_app();
        let response = app
            .oneshot(login_request("alice", ALICE_PASSWORD))
            .await
            .unwrap();
        let cookies = extract_cookies(&response);
        assert!(!cookies.is_empty());
        assert!(cookies.iter().all(|c| !c.contains("Secure")), "{cookies:?}");
    }

    #[tokio::test]
    async fn secure_cookies_flag_marks_session_cookie() {
        let app = create_auth_app_with(auth_config().with("web", "secure_cookies", "true"));
        let response = app
            .oneshot(login_request("alice", ALICE_PASSWORD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookies = extract_cookies(&response);
        assert!(cookies.iter().any(|c| c.contains("Secure")), "{cookies:?}");
    }

    #[tokio::test]
    async fn login_follows_local_next_only() {
        let app = create_auth_app();

        let local = app
            .clone()
            .oneshot(login_request_with_next("/watchlist"))
            .await
            .unwrap();
        assert_eq!(location(&local), "/watchlist");

        let external = app
            .oneshot(login_request_with_next("https://evil.example/"))
            .await
            .unwrap();
        assert_eq!(location(&external), "/");
    }

    fn login_request_with_next(next: &str) -> Request<Body> {
        let form_data = format!(
            "username=alice&password={}&next={}",
            ALICE_PASSWORD,
            next.replace(':', "%3A").replace('/', "%2F")
        );
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_data))
            .unwrap()
    }

    #[tokio::test]
    async fn login_with_wrong_password_shows_error() {
        let app = create_auth_app();

        let response = app
            .oneshot(login_request("alice", BOB_PASSWORD))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(
            html.contains("Invalid username or password"),
            "should show error message"
        );
    }

    #[tokio::test]
    async fn login_with_wrong_username_shows_error() {
        let app = create_auth_app();

        let response = app
            .oneshot(login_request("mallory", ALICE_PASSWORD))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn authenticated_user_can_access_protected_route() {
        let app = create_auth_app();
        let cookie = login_cookie(&app, "alice", ALICE_PASSWORD).await;

        let response = app.oneshot(get("/", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Dashboard"));
        assert!(html.contains("Welcome, Alice."));
    }

    #[tokio::test]
    async fn each_user_sees_their_own_name() {
        let app = create_auth_app();
        let cookie = login_cookie(&app, "bob", BOB_PASSWORD).await;

        let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
        assert!(html.contains("Welcome, Bob."));
        assert!(!html.contains("Welcome, Alice."));
    }

    #[tokio::test]
    async fn logout_redirects_to_login() {
        let app = create_auth_app();
        let cookie = login_cookie(&app, "alice", ALICE_PASSWORD).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn full_flow_login_access_logout_denied() {
        let app = create_auth_app();

        // 1. Login with correct credentials
        let cookie = login_cookie(&app, "alice", ALICE_PASSWORD).await;
        assert!(!cookie.is_empty());

        // 2. Access protected route succeeds
        let dash_resp = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(dash_resp.status(), StatusCode::OK);

        // 3. Logout
        let logout_resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(logout_resp.status(), StatusCode::SEE_OTHER);

        // 4. Access protected route denied after logout
        let denied_resp = app.oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(denied_resp.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = location(&denied_resp);
        assert!(
            location.starts_with("/login"),
            "should redirect to /login, got: {location}"
        );
    }

    #[tokio::test]
    async fn forged_cookie_is_rejected() {
        let app = create_auth_app();
        let response = app
            .oneshot(get("/", Some("id=not-a-real-session")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
