use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schemas::user::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(length(max = 100, message = "username is too long"))]
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(length(max = 100, message = "username is too long"))]
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) confirm_password: String,
    /// `student` when omitted.
    #[serde(default)]
    pub(crate) role: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) redirect_to: String,
    pub(crate) user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForgotPasswordRequest {
    pub(crate) username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetPasswordRequest {
    pub(crate) new_password: String,
    pub(crate) confirm_password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResetPasswordPage {
    pub(crate) username: String,
}
