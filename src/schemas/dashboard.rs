use serde::Serialize;

use crate::db::models::{LiveClass, RevisionMaterial, Video};
use crate::schemas::profile::{StudentProfileResponse, StudentSummary, TeacherProfileResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StudentState {
    Active,
    Inactive,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentDashboard {
    pub(crate) state: StudentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notice: Option<String>,
    pub(crate) student: StudentSummary,
    pub(crate) live_classes: Vec<LiveClass>,
    pub(crate) materials: Vec<RevisionMaterial>,
    pub(crate) videos: Vec<Video>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherDashboard {
    pub(crate) teacher: TeacherProfileResponse,
    pub(crate) live_classes: Vec<LiveClass>,
    pub(crate) materials: Vec<RevisionMaterial>,
    pub(crate) videos: Vec<Video>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminCounts {
    pub(crate) total_students: i64,
    pub(crate) total_teachers: i64,
    pub(crate) pending_teachers: i64,
    pub(crate) pending_students: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminDashboard {
    pub(crate) counts: AdminCounts,
    pub(crate) live_classes: Vec<LiveClass>,
    pub(crate) materials: Vec<RevisionMaterial>,
    pub(crate) videos: Vec<Video>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ManageStudentsResponse {
    pub(crate) students: Vec<StudentProfileResponse>,
    pub(crate) search: String,
    pub(crate) sort: &'static str,
    pub(crate) order: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ManageTeachersResponse {
    pub(crate) teachers: Vec<TeacherProfileResponse>,
}
