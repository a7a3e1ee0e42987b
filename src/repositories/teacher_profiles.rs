use time::PrimitiveDateTime;

use crate::db::models::TeacherProfile;

/// Unique constraint guarding one profile per credential.
pub(crate) const USER_ID_KEY: &str = "teacher_profiles_user_id_key";

const COLUMNS: &str =
    "id, user_id, teacher_name, phone_number, subject, is_approved, created_at, updated_at";

pub(crate) async fn find_by_user_id(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<TeacherProfile>, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>(&format!(
        "SELECT {COLUMNS} FROM teacher_profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) struct CreateTeacherProfile<'a> {
    pub(crate) user_id: i64,
    pub(crate) teacher_name: &'a str,
    pub(crate) phone_number: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateTeacherProfile<'_>,
) -> Result<TeacherProfile, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>(&format!(
        "INSERT INTO teacher_profiles (
            user_id, teacher_name, phone_number, subject, is_approved, created_at, updated_at
         ) VALUES ($1, $2, $3, $4, FALSE, $5, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.teacher_name)
    .bind(params.phone_number)
    .bind(params.subject)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn set_approved(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
    is_approved: bool,
    now: PrimitiveDateTime,
) -> Result<Option<TeacherProfile>, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>(&format!(
        "UPDATE teacher_profiles SET is_approved = $1, updated_at = $2 WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(is_approved)
    .bind(now)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_all(
    executor: impl sqlx::PgExecutor<'_>,
) -> Result<Vec<TeacherProfile>, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>(&format!(
        "SELECT {COLUMNS} FROM teacher_profiles ORDER BY id"
    ))
    .fetch_all(executor)
    .await
}

pub(crate) async fn count_all(executor: impl sqlx::PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teacher_profiles").fetch_one(executor).await
}

pub(crate) async fn count_pending(
    executor: impl sqlx::PgExecutor<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teacher_profiles WHERE NOT is_approved")
        .fetch_one(executor)
        .await
}
