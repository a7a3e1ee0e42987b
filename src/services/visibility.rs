use crate::db::models::{LiveClass, RevisionMaterial, Video};

/// Sentinel form value that makes an item visible to every viewer.
const ALL_FORMS: &str = "all";

/// Content that is targeted at a class level ("form").
pub(crate) trait FormScoped {
    fn form(&self) -> Option<&str>;
}

impl FormScoped for LiveClass {
    fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }
}

impl FormScoped for RevisionMaterial {
    fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }
}

impl FormScoped for Video {
    fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }
}

pub(crate) fn normalize_form(value: Option<&str>) -> String {
    value.map(|form| form.trim().to_lowercase()).unwrap_or_default()
}

/// Whether an item targeted at `item_form` is shown to a viewer in `viewer_form`.
///
/// Untargeted items (no form, blank form, or "all") are shared by everyone; every other item is
/// shown only when both values agree after trimming and lowercasing.
pub(crate) fn is_visible_to(item_form: Option<&str>, viewer_form: Option<&str>) -> bool {
    let item = normalize_form(item_form);
    if item.is_empty() || item == ALL_FORMS {
        return true;
    }
    item == normalize_form(viewer_form)
}

/// Keeps the items a viewer in `viewer_form` may see, in their original order.
pub(crate) fn visible_items<T: FormScoped>(items: Vec<T>, viewer_form: Option<&str>) -> Vec<T> {
    items.into_iter().filter(|item| is_visible_to(item.form(), viewer_form)).collect()
}
