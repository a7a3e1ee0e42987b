use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::api::flash::Flash;
use crate::core::{security, state::AppState, time::primitive_now_utc};
use crate::db::models::TeacherProfile;
use crate::db::types::UserRole;
use crate::repositories;

const NOT_AUTHENTICATED: &str = "Not authenticated";
pub(crate) const PENDING_APPROVAL_NOTICE: &str =
    "Your profile is awaiting admin approval. Please wait before accessing your dashboard.";

/// Identity of the caller, resolved from the bearer token and its session row.
#[derive(Debug, Clone)]
pub(crate) struct AuthContext {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) session_id: String,
}

pub(crate) struct AdminContext(pub(crate) AuthContext);
pub(crate) struct TeacherContext(pub(crate) AuthContext);
pub(crate) struct StudentContext(pub(crate) AuthContext);

/// A teacher whose profile exists and has been approved by an admin.
pub(crate) struct ApprovedTeacher {
    pub(crate) auth: AuthContext,
    pub(crate) profile: TeacherProfile,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let token = bearer_token(parts).ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized(NOT_AUTHENTICATED))?;
        let user_id: i64 =
            claims.sub.parse().map_err(|_| ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        let session =
            repositories::auth_sessions::find_active(app_state.db(), &claims.sid, primitive_now_utc())
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load session"))?;
        let Some(session) = session.filter(|session| session.user_id == user_id) else {
            return Err(ApiError::Unauthorized(NOT_AUTHENTICATED));
        };

        let user = repositories::users::find_by_id(app_state.db(), user_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?
            .filter(|user| user.role == session.role)
            .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        Ok(AuthContext {
            user_id: user.id,
            username: user.username,
            role: user.role,
            session_id: session.id,
        })
    }
}

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: UserRole,
) -> Result<AuthContext, ApiError> {
    let auth = AuthContext::from_request_parts(parts, state).await?;
    if auth.role == role {
        Ok(auth)
    } else {
        Err(ApiError::Forbidden("Access denied"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::Admin).await.map(AdminContext)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for TeacherContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::Teacher).await.map(TeacherContext)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for StudentContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::Student).await.map(StudentContext)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ApprovedTeacher {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TeacherContext(auth) = TeacherContext::from_request_parts(parts, state).await?;

        let profile = repositories::teacher_profiles::find_by_user_id(state.db(), auth.user_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load teacher profile"))?;

        let Some(profile) = profile else {
            return Err(ApiError::Redirect(Flash::info(
                "Please complete your profile first.",
                format!("/complete_teacher_profile/{}", auth.user_id),
            )));
        };

        if !profile.is_approved {
            // Forced logout: the session must not outlive the denial.
            repositories::auth_sessions::delete(state.db(), &auth.session_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to end session"))?;
            tracing::info!(user_id = auth.user_id, "Ended session of unapproved teacher");
            return Err(ApiError::PendingApproval(PENDING_APPROVAL_NOTICE));
        }

        Ok(ApprovedTeacher { auth, profile })
    }
}
