use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{StudentProfile, TeacherProfile};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentProfileRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "first_name is too long"))]
    pub(crate) first_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "middle_name is too long"))]
    pub(crate) middle_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "last_name is too long"))]
    pub(crate) last_name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "contact_no is too long"))]
    pub(crate) contact_no: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "guardian_name is too long"))]
    pub(crate) guardian_name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "form is too long"))]
    pub(crate) form: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherProfileRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "teacher_name is too long"))]
    pub(crate) teacher_name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "phone_number is too long"))]
    pub(crate) phone_number: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "subject is too long"))]
    pub(crate) subject: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentProfileResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) first_name: String,
    pub(crate) middle_name: Option<String>,
    pub(crate) last_name: String,
    pub(crate) contact_no: String,
    pub(crate) guardian_name: String,
    pub(crate) form: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<StudentProfile> for StudentProfileResponse {
    fn from(profile: StudentProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            first_name: profile.first_name,
            middle_name: profile.middle_name,
            last_name: profile.last_name,
            contact_no: profile.contact_no,
            guardian_name: profile.guardian_name,
            form: profile.form,
            is_active: profile.is_active,
            created_at: format_primitive(profile.created_at),
            updated_at: format_primitive(profile.updated_at),
        }
    }
}

/// What a student sees about themselves on the dashboard.
#[derive(Debug, Serialize)]
pub(crate) struct StudentSummary {
    pub(crate) name: String,
    pub(crate) form: String,
    pub(crate) phone: String,
    pub(crate) guardian_name: String,
    pub(crate) active: bool,
}

impl From<&StudentProfile> for StudentSummary {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            name: profile.full_name(),
            form: profile.form.clone(),
            phone: profile.contact_no.clone(),
            guardian_name: profile.guardian_name.clone(),
            active: profile.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherProfileResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) teacher_name: String,
    pub(crate) phone_number: String,
    pub(crate) subject: String,
    pub(crate) is_approved: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<TeacherProfile> for TeacherProfileResponse {
    fn from(profile: TeacherProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            teacher_name: profile.teacher_name,
            phone_number: profile.phone_number,
            subject: profile.subject,
            is_approved: profile.is_approved,
            created_at: format_primitive(profile.created_at),
            updated_at: format_primitive(profile.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherProfilePage {
    pub(crate) user_id: i64,
    pub(crate) username: String,
}
