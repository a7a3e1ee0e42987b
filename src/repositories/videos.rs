use crate::db::models::Video;

const COLUMNS: &str = "id, title, link, form, subject";

pub(crate) struct VideoFields<'a> {
    pub(crate) title: &'a str,
    pub(crate) link: &'a str,
    pub(crate) form: Option<&'a str>,
    pub(crate) subject: Option<&'a str>,
}

pub(crate) async fn list_all(executor: impl sqlx::PgExecutor<'_>) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {COLUMNS} FROM videos ORDER BY id"))
        .fetch_all(executor)
        .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {COLUMNS} FROM videos WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    fields: VideoFields<'_>,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        "INSERT INTO videos (title, link, form, subject) VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(fields.title)
    .bind(fields.link)
    .bind(fields.form)
    .bind(fields.subject)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
    fields: VideoFields<'_>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        "UPDATE videos SET title = $1, link = $2, form = $3, subject = $4 WHERE id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(fields.title)
    .bind(fields.link)
    .bind(fields.form)
    .bind(fields.subject)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) async fn count(executor: impl sqlx::PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos").fetch_one(executor).await
}
