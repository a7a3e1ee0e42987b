use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::flash::Flash;
use crate::api::guards::AdminContext;
use crate::core::{state::AppState, time::primitive_now_utc};
use crate::repositories;
use crate::schemas::dashboard::{ManageStudentsResponse, ManageTeachersResponse};
use crate::schemas::profile::{StudentProfileResponse, TeacherProfileResponse};
use crate::services::student_directory::StudentQuery;

const MANAGE_TEACHERS: &str = "/admin/manage_teachers";

#[derive(Debug, Default, Deserialize)]
struct ManageStudentsParams {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    order: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/manage_students", get(manage_students))
        .route("/mark_paid/:id", get(mark_paid))
        .route("/mark_blocked/:id", get(mark_blocked))
        .route("/admin/manage_teachers", get(manage_teachers))
        .route("/admin/approve_teacher/:id", get(approve_teacher))
        .route("/admin/block_teacher/:id", get(block_teacher))
}

async fn manage_students(
    State(state): State<AppState>,
    AdminContext(_admin): AdminContext,
    Query(params): Query<ManageStudentsParams>,
) -> Result<Json<ManageStudentsResponse>, ApiError> {
    let query = StudentQuery::from_params(
        params.search.as_deref(),
        params.sort.as_deref(),
        params.order.as_deref(),
    );

    let students = repositories::student_profiles::search(state.db(), &query)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to search students"))?;

    Ok(Json(ManageStudentsResponse {
        students: students.into_iter().map(StudentProfileResponse::from).collect(),
        search: query.search.clone().unwrap_or_default(),
        sort: query.sort.column(),
        order: if query.descending { "desc" } else { "asc" },
    }))
}

async fn set_student_active(
    state: &AppState,
    admin_id: i64,
    id: i64,
    is_active: bool,
) -> Flash {
    let action = if is_active { "mark_paid" } else { "mark_blocked" };
    match repositories::student_profiles::set_active(state.db(), id, is_active, primitive_now_utc())
        .await
    {
        Ok(Some(profile)) => {
            tracing::info!(admin_id, action, student_id = id, "Admin changed student activation");
            let message = if is_active {
                format!("{} marked as paid.", profile.full_name())
            } else {
                format!("{} has been blocked.", profile.full_name())
            };
            Flash::success(message, "/admin")
        }
        Ok(None) => Flash::danger("Student not found.", "/admin"),
        Err(err) => Flash::failure(err, "Failed to update student activation", "/admin"),
    }
}

async fn mark_paid(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    Path(id): Path<i64>,
) -> Flash {
    set_student_active(&state, admin.user_id, id, true).await
}

async fn mark_blocked(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    Path(id): Path<i64>,
) -> Flash {
    set_student_active(&state, admin.user_id, id, false).await
}

async fn manage_teachers(
    State(state): State<AppState>,
    AdminContext(_admin): AdminContext,
) -> Result<Json<ManageTeachersResponse>, ApiError> {
    let teachers = repositories::teacher_profiles::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load teachers"))?;

    Ok(Json(ManageTeachersResponse {
        teachers: teachers.into_iter().map(TeacherProfileResponse::from).collect(),
    }))
}

async fn set_teacher_approved(
    state: &AppState,
    admin_id: i64,
    id: i64,
    is_approved: bool,
) -> Flash {
    let action = if is_approved { "approve_teacher" } else { "block_teacher" };
    match repositories::teacher_profiles::set_approved(
        state.db(),
        id,
        is_approved,
        primitive_now_utc(),
    )
    .await
    {
        Ok(Some(profile)) => {
            tracing::info!(admin_id, action, teacher_id = id, "Admin changed teacher approval");
            let message = if is_approved {
                format!("{} has been approved.", profile.teacher_name)
            } else {
                format!("{} has been blocked.", profile.teacher_name)
            };
            Flash::success(message, MANAGE_TEACHERS)
        }
        Ok(None) => Flash::danger("Teacher not found.", MANAGE_TEACHERS),
        Err(err) => Flash::failure(err, "Failed to update teacher approval", MANAGE_TEACHERS),
    }
}

async fn approve_teacher(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    Path(id): Path<i64>,
) -> Flash {
    set_teacher_approved(&state, admin.user_id, id, true).await
}

async fn block_teacher(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    Path(id): Path<i64>,
) -> Flash {
    set_teacher_approved(&state, admin.user_id, id, false).await
}

#[cfg(test)]
mod tests;
