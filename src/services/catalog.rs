use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::models::{LiveClass, RevisionMaterial, Video};
use crate::repositories::{
    live_classes::{self, LiveClassFields},
    materials::{self, MaterialFields},
    videos::{self, VideoFields},
};
use crate::schemas::content::{ItemPatch, NewItem};
use crate::schemas::{optional, required};
use crate::services::share_links::{resolve_share_link, ShareTarget};

pub(crate) const TITLE_AND_LINK_REQUIRED: &str = "Title and link are required.";
/// Materials and videos keep a shorter form column than live classes.
const MEDIA_FORM_MAX_CHARS: usize = 20;
const MEDIA_FORM_TOO_LONG: &str = "form is too long";

#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("item not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The closed set of content kinds the portal publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentKind {
    LiveClass,
    Material,
    Video,
}

impl ContentKind {
    /// Type tag used by the JSON item API.
    pub(crate) fn from_api_tag(tag: &str) -> Option<Self> {
        match tag {
            "live" => Some(Self::LiveClass),
            "material" => Some(Self::Material),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::LiveClass => "live_class",
            Self::Material => "material",
            Self::Video => "video",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::LiveClass => "Live class",
            Self::Material => "Material",
            Self::Video => "Video",
        }
    }

    /// How Drive share links are rewritten for this kind, if at all.
    pub(crate) fn share_target(self) -> Option<ShareTarget> {
        match self {
            Self::LiveClass => None,
            Self::Material => Some(ShareTarget::Download),
            Self::Video => Some(ShareTarget::Preview),
        }
    }

    pub(crate) fn resolve_link(self, link: &str) -> String {
        match self.share_target() {
            Some(target) => resolve_share_link(link, target),
            None => link.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum CatalogItem {
    LiveClass(LiveClass),
    Material(RevisionMaterial),
    Video(Video),
}

pub(crate) async fn find(
    pool: &PgPool,
    kind: ContentKind,
    id: i64,
) -> Result<Option<CatalogItem>, sqlx::Error> {
    Ok(match kind {
        ContentKind::LiveClass => {
            live_classes::find_by_id(pool, id).await?.map(CatalogItem::LiveClass)
        }
        ContentKind::Material => materials::find_by_id(pool, id).await?.map(CatalogItem::Material),
        ContentKind::Video => videos::find_by_id(pool, id).await?.map(CatalogItem::Video),
    })
}

/// Deletes an item; `false` when there was nothing to delete.
pub(crate) async fn delete(pool: &PgPool, kind: ContentKind, id: i64) -> Result<bool, sqlx::Error> {
    match kind {
        ContentKind::LiveClass => live_classes::delete(pool, id).await,
        ContentKind::Material => materials::delete(pool, id).await,
        ContentKind::Video => videos::delete(pool, id).await,
    }
}

/// Creates an item from the JSON item API and returns its id.
pub(crate) async fn create(pool: &PgPool, item: &NewItem) -> Result<i64, CatalogError> {
    let id = match item {
        NewItem::Live(live) => {
            let (title, link) = title_and_link(&live.title, &live.link)?;
            live_classes::create(
                pool,
                LiveClassFields {
                    title,
                    link,
                    time: optional(live.time.as_deref()),
                    form: optional(live.form.as_deref()),
                    subject: optional(live.subject.as_deref()),
                    active: live.active,
                },
            )
            .await?
            .id
        }
        NewItem::Material(material) => {
            let (title, link) = title_and_link(&material.title, &material.link)?;
            let link = ContentKind::Material.resolve_link(link);
            materials::create(
                pool,
                MaterialFields {
                    title,
                    subject: optional(material.subject.as_deref()),
                    form: optional(material.form.as_deref()),
                    link: Some(&link),
                    file_path: None,
                },
            )
            .await?
            .id
        }
        NewItem::Video(video) => {
            let (title, link) = title_and_link(&video.title, &video.link)?;
            let link = ContentKind::Video.resolve_link(link);
            videos::create(
                pool,
                VideoFields {
                    title,
                    link: &link,
                    form: optional(video.form.as_deref()),
                    subject: optional(video.subject.as_deref()),
                },
            )
            .await?
            .id
        }
    };

    Ok(id)
}

/// Applies a partial update; fields missing from `patch` keep their stored value.
pub(crate) async fn apply_patch(
    pool: &PgPool,
    kind: ContentKind,
    id: i64,
    patch: &ItemPatch,
) -> Result<(), CatalogError> {
    let form_too_long = patch
        .form
        .as_deref()
        .is_some_and(|form| form.trim().chars().count() > MEDIA_FORM_MAX_CHARS);
    if kind != ContentKind::LiveClass && form_too_long {
        return Err(CatalogError::Invalid(MEDIA_FORM_TOO_LONG));
    }

    let mut tx = pool.begin().await?;

    let updated = match kind {
        ContentKind::LiveClass => {
            let current =
                live_classes::find_by_id(&mut *tx, id).await?.ok_or(CatalogError::NotFound)?;
            let (title, link) = title_and_link(
                patch.title.as_deref().unwrap_or(&current.title),
                patch.link.as_deref().unwrap_or(&current.link),
            )?;
            live_classes::update(
                &mut *tx,
                id,
                LiveClassFields {
                    title,
                    link,
                    time: optional(patch.time.as_deref().or(current.time.as_deref())),
                    form: optional(patch.form.as_deref().or(current.form.as_deref())),
                    subject: optional(patch.subject.as_deref().or(current.subject.as_deref())),
                    active: patch.active.unwrap_or(current.active),
                },
            )
            .await?
            .is_some()
        }
        ContentKind::Material => {
            let current =
                materials::find_by_id(&mut *tx, id).await?.ok_or(CatalogError::NotFound)?;
            let title = required(patch.title.as_deref().unwrap_or(&current.title))
                .ok_or(CatalogError::Invalid(TITLE_AND_LINK_REQUIRED))?;
            let link = match patch.link.as_deref() {
                Some(link) => Some(
                    required(link)
                        .map(|link| ContentKind::Material.resolve_link(link))
                        .ok_or(CatalogError::Invalid(TITLE_AND_LINK_REQUIRED))?,
                ),
                None => current.link.clone(),
            };
            // A stored upload stays referenced only while the link still points at it.
            let file_path =
                current.file_path.as_deref().filter(|path| link.as_deref() == Some(*path));
            materials::update(
                &mut *tx,
                id,
                MaterialFields {
                    title,
                    subject: optional(patch.subject.as_deref().or(current.subject.as_deref())),
                    form: optional(patch.form.as_deref().or(current.form.as_deref())),
                    link: link.as_deref(),
                    file_path,
                },
            )
            .await?
            .is_some()
        }
        ContentKind::Video => {
            let current = videos::find_by_id(&mut *tx, id).await?.ok_or(CatalogError::NotFound)?;
            let (title, link) = title_and_link(
                patch.title.as_deref().unwrap_or(&current.title),
                patch.link.as_deref().unwrap_or(&current.link),
            )?;
            let link = ContentKind::Video.resolve_link(link);
            videos::update(
                &mut *tx,
                id,
                VideoFields {
                    title,
                    link: &link,
                    form: optional(patch.form.as_deref().or(current.form.as_deref())),
                    subject: optional(patch.subject.as_deref().or(current.subject.as_deref())),
                },
            )
            .await?
            .is_some()
        }
    };

    if !updated {
        return Err(CatalogError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}

fn title_and_link<'a>(title: &'a str, link: &'a str) -> Result<(&'a str, &'a str), CatalogError> {
    match (required(title), required(link)) {
        (Some(title), Some(link)) => Ok((title, link)),
        _ => Err(CatalogError::Invalid(TITLE_AND_LINK_REQUIRED)),
    }
}
