use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use time::PrimitiveDateTime;
use url::Url;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::flash::Flash;
use crate::api::guards::{AuthContext, PENDING_APPROVAL_NOTICE};
use crate::core::{metrics, security, state::AppState, time::primitive_now_utc};
use crate::db::is_unique_violation;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordPage, ResetPasswordRequest,
    TokenResponse,
};
use crate::schemas::user::UserResponse;

/// Max attempts per window for login and registration.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USERNAME_TAKEN: &str = "Username already exists";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", get(logout))
        .route("/forgot_password", post(forgot_password))
        .route("/reset_password/:username", get(reset_password_page).post(reset_password))
}

async fn check_rate_limit(
    state: &AppState,
    scope: &str,
    username: &str,
    message: &'static str,
) -> Result<(), ApiError> {
    let rate_key = format!("rl:{scope}:{username}");
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if allowed {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests(message))
    }
}

/// Records a new session row for `user` and signs a token naming it.
pub(crate) async fn issue_session(state: &AppState, user: &User) -> Result<String, ApiError> {
    let session_id = Uuid::new_v4().to_string();
    let now = primitive_now_utc();
    let expires_at: PrimitiveDateTime = now + security::token_lifetime(state.settings());

    repositories::auth_sessions::create(
        state.db(),
        repositories::auth_sessions::CreateSession {
            id: &session_id,
            user_id: user.id,
            role: user.role,
            created_at: now,
            expires_at,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create session"))?;

    security::create_access_token(user.id, &session_id, user.role, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))
}

/// Where a freshly authenticated user lands, or why they may not log in yet.
async fn landing_page(state: &AppState, user: &User) -> Result<String, ApiError> {
    match user.role {
        UserRole::Admin => Ok("/admin".to_string()),
        UserRole::Teacher => {
            let profile = repositories::teacher_profiles::find_by_user_id(state.db(), user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load teacher profile"))?;
            match profile {
                None => Ok(format!("/complete_teacher_profile/{}", user.id)),
                Some(profile) if !profile.is_approved => {
                    Err(ApiError::PendingApproval(PENDING_APPROVAL_NOTICE))
                }
                Some(_) => Ok("/teacher_dashboard".to_string()),
            }
        }
        UserRole::Student => {
            let profile = repositories::student_profiles::find_by_user_id(state.db(), user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load student profile"))?;
            Ok(if profile.is_some() { "/student" } else { "/complete_profile" }.to_string())
        }
    }
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let username = payload.username.trim();
    let password = payload.password.trim();
    if username.is_empty() || password.is_empty() {
        metrics::record_login("invalid");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    check_rate_limit(&state, "login", username, "Too many login attempts, try again later")
        .await?;

    let user = repositories::users::find_by_username(state.db(), username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;
    let Some(user) = user else {
        metrics::record_login("invalid");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    let allow_plaintext = state.settings().security().plaintext_password_fallback;
    match security::check_password(password, &user.password, allow_plaintext) {
        security::PasswordMatch::Hash => {}
        security::PasswordMatch::LegacyPlaintext => {
            tracing::warn!(user_id = user.id, "Accepted plain text password from legacy row");
        }
        security::PasswordMatch::Mismatch => {
            metrics::record_login("invalid");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
        }
    }

    let redirect_to = match landing_page(&state, &user).await {
        Ok(path) => path,
        Err(err) => {
            if matches!(err, ApiError::PendingApproval(_)) {
                metrics::record_login("pending_approval");
                tracing::info!(user_id = user.id, "Login refused: teacher awaiting approval");
            }
            return Err(err);
        }
    };

    let token = issue_session(&state, &user).await?;
    metrics::record_login("success");
    tracing::info!(user_id = user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        redirect_to,
        user: UserResponse::from(&user),
    }))
}

fn parse_registration_role(value: Option<&str>) -> Result<UserRole, ApiError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None | Some("student") => Ok(UserRole::Student),
        Some("teacher") => Ok(UserRole::Teacher),
        // Admins are only ever created at bootstrap.
        Some(_) => Err(ApiError::BadRequest("Invalid role".to_string())),
    }
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Flash, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let username = payload.username.trim();
    let password = payload.password.trim();
    let confirm_password = payload.confirm_password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required".to_string()));
    }
    if password != confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }
    let role = parse_registration_role(payload.role.as_deref())?;

    check_rate_limit(&state, "register", username, "Too many signup attempts, try again later")
        .await?;

    let exists = repositories::users::exists_by_username(state.db(), username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if exists {
        return Err(ApiError::BadRequest(USERNAME_TAKEN.to_string()));
    }

    let hashed = security::hash_password(password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = match repositories::users::create(state.db(), username, &hashed, role).await {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::BadRequest(USERNAME_TAKEN.to_string()));
        }
        Err(err) => return Err(ApiError::internal(err, "Failed to create user")),
    };

    tracing::info!(user_id = user.id, role = role.as_str(), "Registered new account");

    let message = match role {
        UserRole::Teacher => "Account created. Please login and complete your profile.",
        _ => "Account created. Please login.",
    };
    Ok(Flash::success(message, "/login"))
}

async fn logout(State(state): State<AppState>, auth: Option<AuthContext>) -> Flash {
    if let Some(auth) = auth {
        match repositories::auth_sessions::delete(state.db(), &auth.session_id).await {
            Ok(_) => tracing::info!(user_id = auth.user_id, "User logged out"),
            Err(err) => tracing::error!(error = %err, "Failed to delete session on logout"),
        }
    }
    Flash::info("You have been logged out.", "/login")
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Flash, ApiError> {
    let username = payload.username.trim();
    let exists = !username.is_empty()
        && repositories::users::exists_by_username(state.db(), username)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check user"))?;

    if !exists {
        return Err(ApiError::NotFound("No account found with that username.".to_string()));
    }

    let location = reset_password_path(username)
        .map_err(|e| ApiError::internal(e, "Failed to build reset link"))?;
    Ok(Flash::info("Enter a new password for your account.", location))
}

/// `/reset_password/{username}` with the username percent-encoded as one path segment.
fn reset_password_path(username: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse("http://portal.local/reset_password")?;
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(username);
    }
    Ok(url.path().to_string())
}

async fn reset_password_page(Path(username): Path<String>) -> Json<ResetPasswordPage> {
    Json(ResetPasswordPage { username })
}

// Any caller who knows a username can reset its password: no reset token is issued.
async fn reset_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Flash, ApiError> {
    let new_password = payload.new_password.trim();
    if new_password.is_empty() {
        return Err(ApiError::BadRequest("Password is required.".to_string()));
    }
    if new_password != payload.confirm_password.trim() {
        return Err(ApiError::BadRequest("Passwords do not match.".to_string()));
    }

    let user = repositories::users::find_by_username(state.db(), &username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;

    if let Some(user) = user {
        let hashed = security::hash_password(new_password)
            .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

        let mut tx =
            state.db().begin().await.map_err(|e| ApiError::internal(e, "Failed to begin"))?;
        repositories::users::update_password(&mut *tx, user.id, &hashed)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update password"))?;
        let revoked = repositories::auth_sessions::delete_for_user(&mut *tx, user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to revoke sessions"))?;
        tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit"))?;

        tracing::info!(user_id = user.id, revoked_sessions = revoked, "Password reset");
    }

    Ok(Flash::success("Password updated successfully! You can now log in.", "/login"))
}

#[cfg(test)]
mod tests;
