//! Rewriting of Google Drive share links into directly usable URLs.

const DRIVE_HOST: &str = "drive.google.com";
const FILE_SEGMENT: &str = "/file/d/";

/// How a rewritten Drive link is going to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShareTarget {
    /// Direct download, used for documents.
    Download,
    /// Embeddable player page, used for videos.
    Preview,
}

/// Extracts the file id from a `drive.google.com/file/d/<id>/...` share URL.
pub(crate) fn drive_file_id(link: &str) -> Option<&str> {
    let trimmed = link.trim();
    let host_at = trimmed.find(DRIVE_HOST)?;
    let after_host = &trimmed[host_at + DRIVE_HOST.len()..];
    let rest = after_host.strip_prefix(FILE_SEGMENT)?;
    let id = rest.split(|c| c == '/' || c == '?' || c == '#').next()?;
    (!id.is_empty()).then_some(id)
}

/// Returns the link to store for `link`: Drive share URLs are rewritten for `target`, every other
/// link is kept as given (trimmed).
pub(crate) fn resolve_share_link(link: &str, target: ShareTarget) -> String {
    match drive_file_id(link) {
        Some(id) => match target {
            ShareTarget::Download => format!("https://{DRIVE_HOST}/uc?export=download&id={id}"),
            ShareTarget::Preview => format!("https://{DRIVE_HOST}/file/d/{id}/preview"),
        },
        None => link.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_view_link_becomes_download_link() {
        let link = "https://drive.google.com/file/d/1AbC-xyz_9/view?usp=sharing";
        assert_eq!(
            resolve_share_link(link, ShareTarget::Download),
            "https://drive.google.com/uc?export=download&id=1AbC-xyz_9"
        );
    }

    #[test]
    fn drive_view_link_becomes_preview_link() {
        let link = "https://drive.google.com/file/d/1AbC-xyz_9/view";
        assert_eq!(
            resolve_share_link(link, ShareTarget::Preview),
            "https://drive.google.com/file/d/1AbC-xyz_9/preview"
        );
    }

    #[test]
    fn id_without_trailing_segment_is_accepted() {
        assert_eq!(drive_file_id("https://drive.google.com/file/d/XYZ"), Some("XYZ"));
        assert_eq!(drive_file_id("drive.google.com/file/d/XYZ?x=1"), Some("XYZ"));
    }

    #[test]
    fn other_links_are_kept() {
        let youtube = "https://www.youtube.com/watch?v=abc";
        assert_eq!(resolve_share_link(youtube, ShareTarget::Preview), youtube);
        let folder = "https://drive.google.com/drive/folders/abc";
        assert_eq!(resolve_share_link(folder, ShareTarget::Download), folder);
        assert_eq!(drive_file_id("https://drive.google.com/file/d/"), None);
    }
}
