use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::services::catalog::CatalogItem;

/// Urlencoded body used to add or edit a live class.
#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct LiveClassForm {
    #[serde(default)]
    #[validate(length(max = 200, message = "title is too long"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "link is too long"))]
    pub(crate) link: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "time is too long"))]
    pub(crate) time: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "form is too long"))]
    pub(crate) form: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "subject is too long"))]
    pub(crate) subject: Option<String>,
    /// HTML checkbox value; any non-empty value other than "false"/"off"/"0" switches it on.
    #[serde(default)]
    pub(crate) active: Option<String>,
}

impl LiveClassForm {
    pub(crate) fn is_active(&self) -> bool {
        match self.active.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "false" | "off" | "0"),
        }
    }
}

/// Urlencoded body used to edit a material or a video.
#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct MediaEditForm {
    #[serde(default)]
    #[validate(length(max = 200, message = "title is too long"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "link is too long"))]
    pub(crate) link: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "form is too long"))]
    pub(crate) form: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "subject is too long"))]
    pub(crate) subject: Option<String>,
}

/// JSON body of `POST /api/add_item`, discriminated by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum NewItem {
    Live(NewLiveItem),
    Material(NewMediaItem),
    Video(NewMediaItem),
}

impl Validate for NewItem {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            NewItem::Live(item) => item.validate(),
            NewItem::Material(item) | NewItem::Video(item) => item.validate(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct NewLiveItem {
    #[validate(length(max = 200, message = "title is too long"))]
    pub(crate) title: String,
    #[validate(length(max = 500, message = "link is too long"))]
    pub(crate) link: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "time is too long"))]
    pub(crate) time: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "form is too long"))]
    pub(crate) form: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "subject is too long"))]
    pub(crate) subject: Option<String>,
    #[serde(default)]
    pub(crate) active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct NewMediaItem {
    #[validate(length(max = 200, message = "title is too long"))]
    pub(crate) title: String,
    #[validate(length(max = 500, message = "link is too long"))]
    pub(crate) link: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "form is too long"))]
    pub(crate) form: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "subject is too long"))]
    pub(crate) subject: Option<String>,
}

/// JSON body of `PUT /api/update_item/{type}/{id}`; absent fields keep their stored value.
/// The `form` cap is the live-class one; media kinds are checked again in the catalog.
#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct ItemPatch {
    #[serde(default)]
    #[validate(length(max = 200, message = "title is too long"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "link is too long"))]
    pub(crate) link: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "time is too long"))]
    pub(crate) time: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "form is too long"))]
    pub(crate) form: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "subject is too long"))]
    pub(crate) subject: Option<String>,
    #[serde(default)]
    pub(crate) active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemApiResponse {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl ItemApiResponse {
    pub(crate) fn ok() -> Self {
        Self { success: true, id: None, error: None }
    }

    pub(crate) fn created(id: i64) -> Self {
        Self { success: true, id: Some(id), error: None }
    }

    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self { success: false, id: None, error: Some(error.into()) }
    }
}

/// Payload of the edit page of a single item.
#[derive(Debug, Serialize)]
pub(crate) struct ItemPage {
    pub(crate) kind: &'static str,
    pub(crate) item: CatalogItem,
}
