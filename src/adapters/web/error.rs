//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::AscentiaError;

use super::templates::{BasePage, ErrorTemplate};

/// Container in the base page that HTMX error fragments are swapped into.
pub const ERROR_TARGET: &str = "#errors";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
    /// Render only the error fragment (HTMX swap target) instead of a page.
    pub fragment: bool,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fragment: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn in_fragment(mut self, fragment: bool) -> Self {
        self.fragment = fragment;
        self
    }
}

pub fn status_from_error(err: &AscentiaError) -> StatusCode {
    match err {
        AscentiaError::InvalidTicker { .. } => StatusCode::BAD_REQUEST,
        AscentiaError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AscentiaError::DataUnavailable { .. }
        | AscentiaError::InsufficientData { .. }
        | AscentiaError::InvalidSeries { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AscentiaError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AscentiaError::ConfigParse { .. }
        | AscentiaError::ConfigMissing { .. }
        | AscentiaError::ConfigInvalid { .. }
        | AscentiaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AscentiaError> for WebError {
    fn from(err: AscentiaError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };

        let content = match template.render() {
            Ok(html) => html,
            Err(_) => return (self.status, self.message).into_response(),
        };

        if self.fragment {
            return (
                self.status,
                [("HX-Retarget", ERROR_TARGET), ("HX-Reswap", "innerHTML")],
                Html(content),
            )
                .into_response();
        }

        let page = BasePage {
            title: "Error",
            user: None,
            content: &content,
        };
        match page.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, Html(content)).into_response(),
        }
    }
}
