use time::PrimitiveDateTime;

use crate::db::models::AuthSession;
use crate::db::types::UserRole;

const COLUMNS: &str = "id, user_id, role";

pub(crate) struct CreateSession<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: i64,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) expires_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateSession<'_>,
) -> Result<AuthSession, sqlx::Error> {
    sqlx::query_as::<_, AuthSession>(&format!(
        "INSERT INTO auth_sessions (id, user_id, role, created_at, expires_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.role)
    .bind(params.created_at)
    .bind(params.expires_at)
    .fetch_one(executor)
    .await
}

/// Returns the session only while it has not expired at `now`.
pub(crate) async fn find_active(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<Option<AuthSession>, sqlx::Error> {
    sqlx::query_as::<_, AuthSession>(&format!(
        "SELECT {COLUMNS} FROM auth_sessions WHERE id = $1 AND expires_at > $2"
    ))
    .bind(id)
    .bind(now)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
pub(crate) async fn count_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM auth_sessions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
}
