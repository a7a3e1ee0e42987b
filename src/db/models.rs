use serde::Serialize;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::UserRole;

#[derive(Debug, Clone, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    /// Argon2 PHC string, or plain text for rows written by older deployments.
    pub(crate) password: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct AuthSession {
    pub(crate) id: String,
    pub(crate) user_id: i64,
    pub(crate) role: UserRole,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct StudentProfile {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) first_name: String,
    pub(crate) middle_name: Option<String>,
    pub(crate) last_name: String,
    pub(crate) contact_no: String,
    pub(crate) guardian_name: String,
    pub(crate) form: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl StudentProfile {
    pub(crate) fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct TeacherProfile {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) teacher_name: String,
    pub(crate) phone_number: String,
    pub(crate) subject: String,
    pub(crate) is_approved: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub(crate) struct LiveClass {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) time: Option<String>,
    pub(crate) form: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub(crate) struct RevisionMaterial {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) subject: Option<String>,
    pub(crate) form: Option<String>,
    pub(crate) link: Option<String>,
    pub(crate) file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub(crate) struct Video {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) form: Option<String>,
    pub(crate) subject: Option<String>,
}
