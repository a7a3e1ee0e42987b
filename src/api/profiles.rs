use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::flash::Flash;
use crate::api::guards::{StudentContext, TeacherContext};
use crate::core::{state::AppState, time::primitive_now_utc};
use crate::db::{is_unique_violation, violated_constraint};
use crate::repositories;
use crate::repositories::student_profiles::UpsertStudentProfile;
use crate::repositories::teacher_profiles::CreateTeacherProfile;
use crate::schemas::profile::{
    StudentProfileRequest, StudentProfileResponse, TeacherProfileRequest, TeacherProfilePage,
};
use crate::schemas::{optional, required};

const REQUIRED_FIELDS: &str = "Please fill all required fields";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/complete_profile", get(student_profile).post(save_student_profile))
        .route(
            "/complete_teacher_profile/:user_id",
            get(teacher_profile_page).post(complete_teacher_profile),
        )
}

async fn student_profile(
    State(state): State<AppState>,
    StudentContext(auth): StudentContext,
) -> Result<Json<Option<StudentProfileResponse>>, ApiError> {
    let profile = repositories::student_profiles::find_by_user_id(state.db(), auth.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student profile"))?;

    Ok(Json(profile.map(StudentProfileResponse::from)))
}

async fn save_student_profile(
    State(state): State<AppState>,
    StudentContext(auth): StudentContext,
    Json(payload): Json<StudentProfileRequest>,
) -> Result<Flash, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (Some(first_name), Some(last_name), Some(contact_no), Some(guardian_name), Some(form)) = (
        required(&payload.first_name),
        required(&payload.last_name),
        required(&payload.contact_no),
        required(&payload.guardian_name),
        required(&payload.form),
    ) else {
        return Err(ApiError::BadRequest(REQUIRED_FIELDS.to_string()));
    };

    let profile = repositories::student_profiles::upsert(
        state.db(),
        UpsertStudentProfile {
            user_id: auth.user_id,
            first_name,
            middle_name: optional(payload.middle_name.as_deref()),
            last_name,
            contact_no,
            guardian_name,
            form,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save student profile"))?;

    tracing::info!(user_id = auth.user_id, profile_id = profile.id, "Saved student profile");
    Ok(Flash::success("Profile saved successfully!", "/student"))
}

/// The caller must be the teacher named in the path and must not have a profile yet.
async fn ensure_can_complete(
    state: &AppState,
    auth_user_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    if auth_user_id != user_id {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let existing = repositories::teacher_profiles::find_by_user_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load teacher profile"))?;
    if existing.is_some() {
        return Err(profile_exists());
    }
    Ok(())
}

fn profile_exists() -> ApiError {
    ApiError::Redirect(Flash::info("Profile already exists. Please login.", "/login"))
}

/// Maps a failed teacher profile insert; a concurrent submit for the same user lands on the
/// `user_id` key rather than the phone number.
fn teacher_profile_conflict(err: sqlx::Error) -> ApiError {
    if !is_unique_violation(&err) {
        return ApiError::internal(err, "Failed to create teacher profile");
    }
    if violated_constraint(&err) == Some(repositories::teacher_profiles::USER_ID_KEY) {
        return profile_exists();
    }
    ApiError::BadRequest("Phone number already registered".to_string())
}

async fn teacher_profile_page(
    State(state): State<AppState>,
    TeacherContext(auth): TeacherContext,
    Path(user_id): Path<i64>,
) -> Result<Json<TeacherProfilePage>, ApiError> {
    ensure_can_complete(&state, auth.user_id, user_id).await?;
    Ok(Json(TeacherProfilePage { user_id, username: auth.username }))
}

async fn complete_teacher_profile(
    State(state): State<AppState>,
    TeacherContext(auth): TeacherContext,
    Path(user_id): Path<i64>,
    Json(payload): Json<TeacherProfileRequest>,
) -> Result<Flash, ApiError> {
    ensure_can_complete(&state, auth.user_id, user_id).await?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (Some(teacher_name), Some(phone_number), Some(subject)) = (
        required(&payload.teacher_name),
        required(&payload.phone_number),
        required(&payload.subject),
    ) else {
        return Err(ApiError::BadRequest(REQUIRED_FIELDS.to_string()));
    };

    let mut tx = state.db().begin().await.map_err(|e| ApiError::internal(e, "Failed to begin"))?;

    let created = repositories::teacher_profiles::create(
        &mut *tx,
        CreateTeacherProfile { user_id, teacher_name, phone_number, subject, now: primitive_now_utc() },
    )
    .await;
    let profile = created.map_err(teacher_profile_conflict)?;

    // The new profile still needs approval, so the current session ends here.
    repositories::auth_sessions::delete(&mut *tx, &auth.session_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to end session"))?;
    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit"))?;

    tracing::info!(user_id, profile_id = profile.id, "Teacher profile submitted for approval");
    Ok(Flash::success("Profile completed successfully!", "/login"))
}
