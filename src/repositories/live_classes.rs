use crate::db::models::LiveClass;

const COLUMNS: &str = "id, title, link, time, form, subject, active";

pub(crate) struct LiveClassFields<'a> {
    pub(crate) title: &'a str,
    pub(crate) link: &'a str,
    pub(crate) time: Option<&'a str>,
    pub(crate) form: Option<&'a str>,
    pub(crate) subject: Option<&'a str>,
    pub(crate) active: bool,
}

pub(crate) async fn list_all(
    executor: impl sqlx::PgExecutor<'_>,
) -> Result<Vec<LiveClass>, sqlx::Error> {
    sqlx::query_as::<_, LiveClass>(&format!("SELECT {COLUMNS} FROM live_classes ORDER BY id"))
        .fetch_all(executor)
        .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<LiveClass>, sqlx::Error> {
    sqlx::query_as::<_, LiveClass>(&format!("SELECT {COLUMNS} FROM live_classes WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    fields: LiveClassFields<'_>,
) -> Result<LiveClass, sqlx::Error> {
    sqlx::query_as::<_, LiveClass>(&format!(
        "INSERT INTO live_classes (title, link, time, form, subject, active)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(fields.title)
    .bind(fields.link)
    .bind(fields.time)
    .bind(fields.form)
    .bind(fields.subject)
    .bind(fields.active)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
    fields: LiveClassFields<'_>,
) -> Result<Option<LiveClass>, sqlx::Error> {
    sqlx::query_as::<_, LiveClass>(&format!(
        "UPDATE live_classes
         SET title = $1, link = $2, time = $3, form = $4, subject = $5, active = $6
         WHERE id = $7
         RETURNING {COLUMNS}"
    ))
    .bind(fields.title)
    .bind(fields.link)
    .bind(fields.time)
    .bind(fields.form)
    .bind(fields.subject)
    .bind(fields.active)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM live_classes WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) async fn count(executor: impl sqlx::PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM live_classes").fetch_one(executor).await
}
