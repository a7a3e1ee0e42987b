use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::flash::Flash;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_to: Option<&'static str>,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    /// Teacher whose profile has not been approved yet.
    PendingApproval(&'static str),
    BadRequest(String),
    NotFound(String),
    TooManyRequests(&'static str),
    Internal(String),
    /// The request cannot proceed here, but the client should be sent elsewhere.
    Redirect(Flash),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

fn error_response(status: StatusCode, detail: String, code: &'static str) -> Response {
    (status, Json(ErrorResponse { status: status.as_u16(), detail, code, redirect_to: None }))
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let mut response = error_response(
                    StatusCode::UNAUTHORIZED,
                    message.to_string(),
                    "not_authenticated",
                );
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => {
                error_response(StatusCode::FORBIDDEN, message.to_string(), "access_denied")
            }
            // The account stays signed out until approval, so the client goes back to login.
            ApiError::PendingApproval(message) => (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    status: StatusCode::FORBIDDEN.as_u16(),
                    detail: message.to_string(),
                    code: "pending_approval",
                    redirect_to: Some("/login"),
                }),
            )
                .into_response(),
            ApiError::BadRequest(message) => {
                error_response(StatusCode::BAD_REQUEST, message, "bad_request")
            }
            ApiError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message, "not_found"),
            ApiError::TooManyRequests(message) => error_response(
                StatusCode::TOO_MANY_REQUESTS,
                message.to_string(),
                "too_many_requests",
            ),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, message, "internal_error")
            }
            ApiError::Redirect(flash) => flash.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn auth_failures_carry_distinct_codes() {
        let response = ApiError::Unauthorized("Not authenticated").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        let body = test_support::read_json(response).await;
        assert_eq!(body["code"], "not_authenticated");

        let response = ApiError::Forbidden("Access denied").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(test_support::read_json(response).await["code"], "access_denied");

        let response = ApiError::PendingApproval("wait").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = test_support::read_json(response).await;
        assert_eq!(body["code"], "pending_approval");
        assert_eq!(body["detail"], "wait");
        assert_eq!(body["redirect_to"], "/login");
    }

    #[tokio::test]
    async fn internal_hides_the_cause() {
        let response = ApiError::internal("connection reset", "Failed to load videos").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test_support::read_json(response).await;
        assert_eq!(body["detail"], "Failed to load videos");
        assert!(body.get("redirect_to").is_none());
    }
}
