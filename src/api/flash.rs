use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub(crate) const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FlashCategory {
    Success,
    Info,
    Danger,
}

/// A one-shot notice plus the page the client should move to: `303 See Other` with a
/// `Location` header and the notice in the body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Flash {
    pub(crate) category: FlashCategory,
    pub(crate) message: String,
    pub(crate) redirect_to: String,
}

impl Flash {
    pub(crate) fn new(
        category: FlashCategory,
        message: impl Into<String>,
        redirect_to: impl Into<String>,
    ) -> Self {
        Self { category, message: message.into(), redirect_to: redirect_to.into() }
    }

    pub(crate) fn success(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self::new(FlashCategory::Success, message, redirect_to)
    }

    pub(crate) fn info(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self::new(FlashCategory::Info, message, redirect_to)
    }

    pub(crate) fn danger(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self::new(FlashCategory::Danger, message, redirect_to)
    }

    /// Logs `err` and flashes the generic failure notice.
    pub(crate) fn failure(
        err: impl std::fmt::Display,
        context: &str,
        redirect_to: impl Into<String>,
    ) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::danger(GENERIC_FAILURE, redirect_to)
    }
}

impl IntoResponse for Flash {
    fn into_response(self) -> Response {
        let location = HeaderValue::from_str(&self.redirect_to)
            .unwrap_or_else(|_| HeaderValue::from_static("/"));
        let mut response = (StatusCode::SEE_OTHER, Json(self)).into_response();
        response.headers_mut().insert(header::LOCATION, location);
        response
    }
}
