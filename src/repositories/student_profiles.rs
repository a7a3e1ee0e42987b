use sqlx::{Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::StudentProfile;
use crate::services::student_directory::StudentQuery;

const COLUMNS: &str = "\
    id, user_id, first_name, middle_name, last_name, contact_no, guardian_name, form, \
    is_active, created_at, updated_at";

#[cfg(test)]
pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "SELECT {COLUMNS} FROM student_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_user_id(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "SELECT {COLUMNS} FROM student_profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) struct UpsertStudentProfile<'a> {
    pub(crate) user_id: i64,
    pub(crate) first_name: &'a str,
    pub(crate) middle_name: Option<&'a str>,
    pub(crate) last_name: &'a str,
    pub(crate) contact_no: &'a str,
    pub(crate) guardian_name: &'a str,
    pub(crate) form: &'a str,
    pub(crate) now: PrimitiveDateTime,
}

/// Creates the profile for `user_id` or rewrites the existing one in place.
/// The activation flag is owned by admins and is never touched here.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertStudentProfile<'_>,
) -> Result<StudentProfile, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "INSERT INTO student_profiles (
            user_id, first_name, middle_name, last_name, contact_no, guardian_name, form,
            is_active, created_at, updated_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $8)
         ON CONFLICT (user_id) DO UPDATE SET
            first_name = EXCLUDED.first_name,
            middle_name = EXCLUDED.middle_name,
            last_name = EXCLUDED.last_name,
            contact_no = EXCLUDED.contact_no,
            guardian_name = EXCLUDED.guardian_name,
            form = EXCLUDED.form,
            updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.first_name)
    .bind(params.middle_name)
    .bind(params.last_name)
    .bind(params.contact_no)
    .bind(params.guardian_name)
    .bind(params.form)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn set_active(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
    is_active: bool,
    now: PrimitiveDateTime,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "UPDATE student_profiles SET is_active = $1, updated_at = $2 WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn count_all(executor: impl sqlx::PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student_profiles").fetch_one(executor).await
}

pub(crate) async fn count_inactive(
    executor: impl sqlx::PgExecutor<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student_profiles WHERE NOT is_active")
        .fetch_one(executor)
        .await
}

pub(crate) async fn search(
    executor: impl sqlx::PgExecutor<'_>,
    query: &StudentQuery,
) -> Result<Vec<StudentProfile>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM student_profiles"));

    if let Some(needle) = query.search.as_deref() {
        // strpos keeps the match a literal substring: '%' and '_' in the needle stay inert.
        builder.push(" WHERE strpos(lower(first_name), ");
        builder.push_bind(needle.to_string());
        builder.push(") > 0 OR strpos(lower(last_name), ");
        builder.push_bind(needle.to_string());
        builder.push(") > 0 OR strpos(lower(form), ");
        builder.push_bind(needle.to_string());
        builder.push(") > 0 OR strpos(lower(contact_no), ");
        builder.push_bind(needle.to_string());
        builder.push(") > 0");
    }

    builder.push(" ORDER BY ");
    builder.push(query.sort.column());
    builder.push(if query.descending { " DESC" } else { " ASC" });
    if query.sort.column() != "id" {
        builder.push(", id ASC");
    }

    builder.build_query_as::<StudentProfile>().fetch_all(executor).await
}
