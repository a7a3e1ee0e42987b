use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post, put},
    Json, Router,
};
use validator::Validate;

use crate::api::guards::AdminContext;
use crate::core::{metrics, state::AppState};
use crate::schemas::content::{ItemApiResponse, ItemPatch, NewItem};
use crate::services::catalog::{self, CatalogError, ContentKind};

/// Failure of the JSON item API, rendered as `{success: false, error}`.
#[derive(Debug)]
pub(crate) enum ItemApiError {
    Invalid(String),
    NotFound,
    Internal,
}

impl From<CatalogError> for ItemApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(message) => Self::Invalid(message.to_string()),
            CatalogError::NotFound => Self::NotFound,
            CatalogError::Database(err) => {
                tracing::error!(error = %err, "Catalog storage failure");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ItemApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ItemApiError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
            ItemApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ItemApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(ItemApiResponse::failed(message))).into_response()
    }
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/add_item", post(add_item))
        .route("/api/update_item/:kind/:id", put(update_item))
        .route("/api/update_item/:kind", put(missing_id))
        .route("/api/delete_item/:kind/:id", delete(delete_item))
        .route("/api/delete_item/:kind", delete(missing_id))
}

fn target(kind: &str, id: &str) -> Result<(ContentKind, i64), ItemApiError> {
    let kind = ContentKind::from_api_tag(kind).ok_or(ItemApiError::NotFound)?;
    let id = id.trim().parse::<i64>().map_err(|_| ItemApiError::NotFound)?;
    Ok((kind, id))
}

async fn add_item(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Json<ItemApiResponse>, ItemApiError> {
    let Json(item) = payload.map_err(|rejection| ItemApiError::Invalid(rejection.body_text()))?;
    item.validate().map_err(|err| ItemApiError::Invalid(err.to_string()))?;

    let kind = match &item {
        NewItem::Live(_) => ContentKind::LiveClass,
        NewItem::Material(_) => ContentKind::Material,
        NewItem::Video(_) => ContentKind::Video,
    };
    let id = catalog::create(state.db(), &item).await?;

    metrics::record_catalog_change(kind.as_str(), "create");
    tracing::info!(admin_id = admin.user_id, kind = kind.as_str(), item_id = id, "Item added via API");
    Ok(Json(ItemApiResponse::created(id)))
}

async fn update_item(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    Path((kind, id)): Path<(String, String)>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<ItemApiResponse>, ItemApiError> {
    let (kind, id) = target(&kind, &id)?;
    let Json(patch) = payload.map_err(|rejection| ItemApiError::Invalid(rejection.body_text()))?;
    patch.validate().map_err(|err| ItemApiError::Invalid(err.to_string()))?;

    catalog::apply_patch(state.db(), kind, id, &patch).await?;

    metrics::record_catalog_change(kind.as_str(), "update");
    tracing::info!(admin_id = admin.user_id, kind = kind.as_str(), item_id = id, "Item updated via API");
    Ok(Json(ItemApiResponse::ok()))
}

async fn delete_item(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ItemApiResponse>, ItemApiError> {
    let (kind, id) = target(&kind, &id)?;

    let deleted = catalog::delete(state.db(), kind, id)
        .await
        .map_err(|err| ItemApiError::from(CatalogError::Database(err)))?;
    if !deleted {
        return Err(ItemApiError::NotFound);
    }

    metrics::record_catalog_change(kind.as_str(), "delete");
    tracing::info!(admin_id = admin.user_id, kind = kind.as_str(), item_id = id, "Item deleted via API");
    Ok(Json(ItemApiResponse::ok()))
}

async fn missing_id(AdminContext(_admin): AdminContext) -> ItemApiError {
    ItemApiError::NotFound
}
