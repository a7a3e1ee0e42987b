use crate::db::models::RevisionMaterial;

const COLUMNS: &str = "id, title, subject, form, link, file_path";

pub(crate) struct MaterialFields<'a> {
    pub(crate) title: &'a str,
    pub(crate) subject: Option<&'a str>,
    pub(crate) form: Option<&'a str>,
    pub(crate) link: Option<&'a str>,
    pub(crate) file_path: Option<&'a str>,
}

pub(crate) async fn list_all(
    executor: impl sqlx::PgExecutor<'_>,
) -> Result<Vec<RevisionMaterial>, sqlx::Error> {
    sqlx::query_as::<_, RevisionMaterial>(&format!(
        "SELECT {COLUMNS} FROM revision_materials ORDER BY id"
    ))
    .fetch_all(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<RevisionMaterial>, sqlx::Error> {
    sqlx::query_as::<_, RevisionMaterial>(&format!(
        "SELECT {COLUMNS} FROM revision_materials WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    fields: MaterialFields<'_>,
) -> Result<RevisionMaterial, sqlx::Error> {
    sqlx::query_as::<_, RevisionMaterial>(&format!(
        "INSERT INTO revision_materials (title, subject, form, link, file_path)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(fields.title)
    .bind(fields.subject)
    .bind(fields.form)
    .bind(fields.link)
    .bind(fields.file_path)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
    fields: MaterialFields<'_>,
) -> Result<Option<RevisionMaterial>, sqlx::Error> {
    sqlx::query_as::<_, RevisionMaterial>(&format!(
        "UPDATE revision_materials
         SET title = $1, subject = $2, form = $3, link = $4, file_path = $5
         WHERE id = $6
         RETURNING {COLUMNS}"
    ))
    .bind(fields.title)
    .bind(fields.subject)
    .bind(fields.form)
    .bind(fields.link)
    .bind(fields.file_path)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM revision_materials WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) async fn count(executor: impl sqlx::PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM revision_materials")
        .fetch_one(executor)
        .await
}
