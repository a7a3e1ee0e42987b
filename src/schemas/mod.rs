use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod auth;
pub(crate) mod content;
pub(crate) mod dashboard;
pub(crate) mod profile;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}

/// Trims a required text field, mapping blank input to `None`.
pub(crate) fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Trims an optional text field, treating blank input as absent.
pub(crate) fn optional(value: Option<&str>) -> Option<&str> {
    value.and_then(required)
}
