use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::flash::Flash;
use crate::api::guards::{AdminContext, ApprovedTeacher, StudentContext};
use crate::core::state::AppState;
use crate::db::models::{LiveClass, RevisionMaterial, Video};
use crate::repositories;
use crate::schemas::dashboard::{
    AdminCounts, AdminDashboard, StudentDashboard, StudentState, TeacherDashboard,
};
use crate::schemas::profile::{StudentSummary, TeacherProfileResponse};
use crate::services::visibility::visible_items;

const INACTIVE_NOTICE: &str = "Your account is not active. Please contact admin to make payment.";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/student", get(student_dashboard))
        .route("/teacher_dashboard", get(teacher_dashboard))
        .route("/admin", get(admin_dashboard))
}

/// Every published item in storage order.
struct Catalog {
    live_classes: Vec<LiveClass>,
    materials: Vec<RevisionMaterial>,
    videos: Vec<Video>,
}

async fn load_catalog(state: &AppState) -> Result<Catalog, ApiError> {
    let live_classes = repositories::live_classes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load live classes"))?;
    let materials = repositories::materials::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load materials"))?;
    let videos = repositories::videos::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load videos"))?;

    Ok(Catalog { live_classes, materials, videos })
}

async fn student_dashboard(
    State(state): State<AppState>,
    StudentContext(auth): StudentContext,
) -> Result<Json<StudentDashboard>, ApiError> {
    let profile = repositories::student_profiles::find_by_user_id(state.db(), auth.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student profile"))?;
    let Some(profile) = profile else {
        return Err(ApiError::Redirect(Flash::info(
            "Please complete your profile first.",
            "/complete_profile",
        )));
    };

    let student = StudentSummary::from(&profile);
    if !profile.is_active {
        return Ok(Json(StudentDashboard {
            state: StudentState::Inactive,
            notice: Some(INACTIVE_NOTICE.to_string()),
            student,
            live_classes: Vec::new(),
            materials: Vec::new(),
            videos: Vec::new(),
        }));
    }

    let catalog = load_catalog(&state).await?;
    let form = Some(profile.form.as_str());

    Ok(Json(StudentDashboard {
        state: StudentState::Active,
        notice: None,
        student,
        live_classes: visible_items(catalog.live_classes, form),
        materials: visible_items(catalog.materials, form),
        videos: visible_items(catalog.videos, form),
    }))
}

async fn teacher_dashboard(
    State(state): State<AppState>,
    teacher: ApprovedTeacher,
) -> Result<Json<TeacherDashboard>, ApiError> {
    let catalog = load_catalog(&state).await?;

    Ok(Json(TeacherDashboard {
        teacher: TeacherProfileResponse::from(teacher.profile),
        live_classes: catalog.live_classes,
        materials: catalog.materials,
        videos: catalog.videos,
    }))
}

async fn admin_dashboard(
    State(state): State<AppState>,
    AdminContext(_admin): AdminContext,
) -> Result<Json<AdminDashboard>, ApiError> {
    let catalog = load_catalog(&state).await?;

    let total_students = repositories::student_profiles::count_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count students"))?;
    let pending_students = repositories::student_profiles::count_inactive(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count inactive students"))?;
    let total_teachers = repositories::teacher_profiles::count_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count teachers"))?;
    let pending_teachers = repositories::teacher_profiles::count_pending(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count pending teachers"))?;

    Ok(Json(AdminDashboard {
        counts: AdminCounts { total_students, total_teachers, pending_teachers, pending_students },
        live_classes: catalog.live_classes,
        materials: catalog.materials,
        videos: catalog.videos,
    }))
}
