use axum::{
    extract::{DefaultBodyLimit, FromRequestParts, Multipart, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::flash::Flash;
use crate::api::guards::{AdminContext, ApprovedTeacher};
use crate::core::{metrics, state::AppState};
use crate::repositories;
use crate::repositories::{
    live_classes::LiveClassFields,
    materials::MaterialFields,
    videos::VideoFields,
};
use crate::schemas::content::{ItemPage, LiveClassForm, MediaEditForm};
use crate::schemas::{optional, required};
use crate::services::catalog::{self, ContentKind, TITLE_AND_LINK_REQUIRED};
use crate::services::uploads::UploadError;

const FILE_OR_LINK_REQUIRED: &str = "You must provide either a file or a link.";
const ALL_FIELDS_REQUIRED: &str = "All fields are required";
/// Room for the text fields of a multipart form on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// A caller allowed to manage the catalog, together with where its dashboard lives.
pub(crate) trait Publisher:
    FromRequestParts<AppState, Rejection = ApiError> + Send + Sync + 'static
{
    /// Route prefix of the management pages.
    const PREFIX: &'static str;
    const DASHBOARD: &'static str;

    fn user_id(&self) -> i64;
}

impl Publisher for AdminContext {
    const PREFIX: &'static str = "/admin";
    const DASHBOARD: &'static str = "/admin";

    fn user_id(&self) -> i64 {
        self.0.user_id
    }
}

impl Publisher for ApprovedTeacher {
    const PREFIX: &'static str = "/teacher";
    const DASHBOARD: &'static str = "/teacher_dashboard";

    fn user_id(&self) -> i64 {
        self.auth.user_id
    }
}

/// Type-level tag selecting which kind a generic route operates on.
pub(crate) trait KindRoute: Send + Sync + 'static {
    const KIND: ContentKind;
}

pub(crate) struct LiveClassRoute;
pub(crate) struct MaterialRoute;
pub(crate) struct VideoRoute;

impl KindRoute for LiveClassRoute {
    const KIND: ContentKind = ContentKind::LiveClass;
}

impl KindRoute for MaterialRoute {
    const KIND: ContentKind = ContentKind::Material;
}

impl KindRoute for VideoRoute {
    const KIND: ContentKind = ContentKind::Video;
}

pub(crate) fn router<P: Publisher>(max_upload_bytes: u64) -> Router<AppState> {
    let prefix = P::PREFIX;
    let body_limit = usize::try_from(max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route(&format!("{prefix}/live_class/add"), post(add_live_class::<P>))
        .route(
            &format!("{prefix}/live_class/edit/:id"),
            get(edit_page::<P, LiveClassRoute>).post(edit_live_class::<P>),
        )
        .route(&format!("{prefix}/live_class/delete/:id"), post(delete_item::<P, LiveClassRoute>))
        .route(
            &format!("{prefix}/material/add"),
            post(add_media::<P, MaterialRoute>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            &format!("{prefix}/material/edit/:id"),
            get(edit_page::<P, MaterialRoute>).post(edit_media::<P, MaterialRoute>),
        )
        .route(&format!("{prefix}/material/delete/:id"), post(delete_item::<P, MaterialRoute>))
        .route(
            &format!("{prefix}/video/add"),
            post(add_media::<P, VideoRoute>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            &format!("{prefix}/video/edit/:id"),
            get(edit_page::<P, VideoRoute>).post(edit_media::<P, VideoRoute>),
        )
        .route(
            &format!("{prefix}/video/delete/:id"),
            get(delete_item::<P, VideoRoute>).post(delete_item::<P, VideoRoute>),
        )
}

fn not_found<P: Publisher>(kind: ContentKind) -> Flash {
    Flash::danger(format!("{} not found.", kind.label()), P::DASHBOARD)
}

fn record_change<P: Publisher>(publisher: &P, kind: ContentKind, action: &'static str, id: i64) {
    metrics::record_catalog_change(kind.as_str(), action);
    tracing::info!(
        actor_id = publisher.user_id(),
        kind = kind.as_str(),
        action,
        item_id = id,
        "Catalog changed"
    );
}

async fn add_live_class<P: Publisher>(
    publisher: P,
    State(state): State<AppState>,
    Form(payload): Form<LiveClassForm>,
) -> Flash {
    if let Err(err) = payload.validate() {
        return Flash::danger(err.to_string(), P::DASHBOARD);
    }
    let (Some(title), Some(link)) = (required(&payload.title), required(&payload.link)) else {
        return Flash::danger(TITLE_AND_LINK_REQUIRED, P::DASHBOARD);
    };

    let created = repositories::live_classes::create(
        state.db(),
        LiveClassFields {
            title,
            link,
            time: optional(payload.time.as_deref()),
            form: optional(payload.form.as_deref()),
            subject: optional(payload.subject.as_deref()),
            active: payload.is_active(),
        },
    )
    .await;

    match created {
        Ok(item) => {
            record_change(&publisher, ContentKind::LiveClass, "create", item.id);
            Flash::success("Live class added successfully!", P::DASHBOARD)
        }
        Err(err) => Flash::failure(err, "Failed to add live class", P::DASHBOARD),
    }
}

struct UploadedFile {
    name: String,
    bytes: axum::body::Bytes,
}

/// Fields of the material/video add form. Caps match `MediaEditForm`.
#[derive(Default, Validate)]
struct MediaSubmission {
    #[validate(length(max = 200, message = "title is too long"))]
    title: String,
    #[validate(length(max = 100, message = "subject is too long"))]
    subject: String,
    #[validate(length(max = 20, message = "form is too long"))]
    form: String,
    #[validate(length(max = 500, message = "link is too long"))]
    link: Option<String>,
    file: Option<UploadedFile>,
}

async fn read_media_form(mut multipart: Multipart) -> Result<MediaSubmission, String> {
    let mut submission = MediaSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| e.body_text())?;
                // Browsers submit an empty, unnamed part when no file was chosen.
                if !file_name.trim().is_empty() || !bytes.is_empty() {
                    submission.file = Some(UploadedFile { name: file_name, bytes });
                }
            }
            "title" | "subject" | "form" | "link" => {
                let value = field.text().await.map_err(|e| e.body_text())?;
                match name.as_str() {
                    "title" => submission.title = value,
                    "subject" => submission.subject = value,
                    "form" => submission.form = value,
                    _ => submission.link = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

async fn add_media<P: Publisher, K: KindRoute>(
    publisher: P,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Flash {
    let kind = K::KIND;
    let submission = match read_media_form(multipart).await {
        Ok(submission) => submission,
        Err(message) => {
            tracing::warn!(error = %message, "Rejected malformed upload form");
            return Flash::danger("Could not read the submitted form.", P::DASHBOARD);
        }
    };
    if let Err(err) = submission.validate() {
        return Flash::danger(err.to_string(), P::DASHBOARD);
    }

    let (Some(title), Some(subject), Some(form)) = (
        required(&submission.title),
        required(&submission.subject),
        required(&submission.form),
    ) else {
        return Flash::danger(ALL_FIELDS_REQUIRED, P::DASHBOARD);
    };

    let (link, file_path) = if let Some(link) = optional(submission.link.as_deref()) {
        (kind.resolve_link(link), None)
    } else if let Some(file) = submission.file.as_ref() {
        match state.uploads().save(&file.name, &file.bytes).await {
            Ok(stored) => (stored.public_path.clone(), Some(stored.public_path)),
            Err(UploadError::TooLarge { limit_mb }) => {
                return Flash::danger(
                    format!("File is too large. The limit is {limit_mb} MB."),
                    P::DASHBOARD,
                );
            }
            Err(UploadError::Io(err)) => {
                return Flash::failure(err, "Failed to store upload", P::DASHBOARD);
            }
            Err(err) => {
                tracing::info!(error = %err, file_name = %file.name, "Rejected upload");
                return Flash::danger(FILE_OR_LINK_REQUIRED, P::DASHBOARD);
            }
        }
    } else {
        return Flash::danger(FILE_OR_LINK_REQUIRED, P::DASHBOARD);
    };

    let created = match kind {
        ContentKind::Material => repositories::materials::create(
            state.db(),
            MaterialFields {
                title,
                subject: Some(subject),
                form: Some(form),
                link: Some(&link),
                file_path: file_path.as_deref(),
            },
        )
        .await
        .map(|item| item.id),
        _ => repositories::videos::create(
            state.db(),
            VideoFields { title, link: &link, form: Some(form), subject: Some(subject) },
        )
        .await
        .map(|item| item.id),
    };

    match created {
        Ok(id) => {
            record_change(&publisher, kind, "create", id);
            Flash::success(format!("{} added successfully!", kind.label()), P::DASHBOARD)
        }
        Err(err) => Flash::failure(err, "Failed to add catalog item", P::DASHBOARD),
    }
}

async fn edit_page<P: Publisher, K: KindRoute>(
    _publisher: P,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let kind = K::KIND;
    match catalog::find(state.db(), kind, id).await {
        Ok(Some(item)) => Json(ItemPage { kind: kind.as_str(), item }).into_response(),
        Ok(None) => not_found::<P>(kind).into_response(),
        Err(err) => Flash::failure(err, "Failed to load catalog item", P::DASHBOARD).into_response(),
    }
}

async fn edit_live_class<P: Publisher>(
    publisher: P,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(payload): Form<LiveClassForm>,
) -> Flash {
    if let Err(err) = payload.validate() {
        return Flash::danger(err.to_string(), P::DASHBOARD);
    }
    let (Some(title), Some(link)) = (required(&payload.title), required(&payload.link)) else {
        return Flash::danger(TITLE_AND_LINK_REQUIRED, P::DASHBOARD);
    };

    let updated = repositories::live_classes::update(
        state.db(),
        id,
        LiveClassFields {
            title,
            link,
            time: optional(payload.time.as_deref()),
            form: optional(payload.form.as_deref()),
            subject: optional(payload.subject.as_deref()),
            active: payload.is_active(),
        },
    )
    .await;

    match updated {
        Ok(Some(_)) => {
            record_change(&publisher, ContentKind::LiveClass, "update", id);
            Flash::success("Live class updated successfully!", P::DASHBOARD)
        }
        Ok(None) => not_found::<P>(ContentKind::LiveClass),
        Err(err) => Flash::failure(err, "Failed to update live class", P::DASHBOARD),
    }
}

async fn edit_media<P: Publisher, K: KindRoute>(
    publisher: P,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(payload): Form<MediaEditForm>,
) -> Flash {
    let kind = K::KIND;
    if let Err(err) = payload.validate() {
        return Flash::danger(err.to_string(), P::DASHBOARD);
    }
    let (Some(title), Some(link)) = (required(&payload.title), required(&payload.link)) else {
        return Flash::danger(TITLE_AND_LINK_REQUIRED, P::DASHBOARD);
    };
    let link = kind.resolve_link(link);
    let form = optional(payload.form.as_deref());
    let subject = optional(payload.subject.as_deref());

    let updated = match kind {
        ContentKind::Material => {
            let mut tx = match state.db().begin().await {
                Ok(tx) => tx,
                Err(err) => return Flash::failure(err, "Failed to begin", P::DASHBOARD),
            };
            let current = match repositories::materials::find_by_id(&mut *tx, id).await {
                Ok(Some(current)) => current,
                Ok(None) => return not_found::<P>(kind),
                Err(err) => return Flash::failure(err, "Failed to load material", P::DASHBOARD),
            };
            // A stored upload stays referenced only while the link still points at it.
            let file_path = current.file_path.filter(|path| *path == link);
            let result = repositories::materials::update(
                &mut *tx,
                id,
                MaterialFields {
                    title,
                    subject,
                    form,
                    link: Some(&link),
                    file_path: file_path.as_deref(),
                },
            )
            .await;
            match result {
                Ok(found) => match tx.commit().await {
                    Ok(()) => Ok(found.is_some()),
                    Err(err) => Err(err),
                },
                Err(err) => Err(err),
            }
        }
        _ => repositories::videos::update(
            state.db(),
            id,
            VideoFields { title, link: &link, form, subject },
        )
        .await
        .map(|found| found.is_some()),
    };

    match updated {
        Ok(true) => {
            record_change(&publisher, kind, "update", id);
            Flash::success(format!("{} updated successfully!", kind.label()), P::DASHBOARD)
        }
        Ok(false) => not_found::<P>(kind),
        Err(err) => Flash::failure(err, "Failed to update catalog item", P::DASHBOARD),
    }
}

async fn delete_item<P: Publisher, K: KindRoute>(
    publisher: P,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Flash {
    let kind = K::KIND;
    match catalog::delete(state.db(), kind, id).await {
        Ok(true) => {
            record_change(&publisher, kind, "delete", id);
            Flash::success(format!("{} deleted successfully!", kind.label()), P::DASHBOARD)
        }
        Ok(false) => not_found::<P>(kind),
        Err(err) => Flash::failure(err, "Failed to delete catalog item", P::DASHBOARD),
    }
}
