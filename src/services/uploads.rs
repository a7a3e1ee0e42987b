use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::config::Settings;

/// Length of the content-hash prefix in stored file names.
const HASH_PREFIX_LEN: usize = 16;

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("file has no name")]
    MissingName,
    #[error("file extension '{0}' is not allowed")]
    ExtensionNotAllowed(String),
    #[error("file is empty")]
    Empty,
    #[error("file exceeds {limit_mb} MB")]
    TooLarge { limit_mb: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file persisted under the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredUpload {
    pub(crate) file_name: String,
    /// Path the file is served from, e.g. `/static/materials/<file_name>`.
    pub(crate) public_path: String,
}

/// Local-disk store for uploaded materials and videos.
#[derive(Debug, Clone)]
pub(crate) struct UploadStore {
    root: PathBuf,
    url_prefix: String,
    max_bytes: u64,
    max_size_mb: u64,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let uploads = settings.uploads();
        Self {
            root: PathBuf::from(&uploads.dir),
            url_prefix: uploads.url_prefix.clone(),
            max_bytes: uploads.max_upload_bytes(),
            max_size_mb: uploads.max_upload_size_mb,
            allowed_extensions: uploads.allowed_extensions.clone(),
        }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Checks the name and size of an upload without touching the disk.
    pub(crate) fn validate(&self, original_name: &str, size: usize) -> Result<(), UploadError> {
        let extension = file_extension(original_name).ok_or(UploadError::MissingName)?;
        if !self.allowed_extensions.iter().any(|allowed| allowed == &extension) {
            return Err(UploadError::ExtensionNotAllowed(extension));
        }
        if size == 0 {
            return Err(UploadError::Empty);
        }
        if size as u64 > self.max_bytes {
            return Err(UploadError::TooLarge { limit_mb: self.max_size_mb });
        }
        Ok(())
    }

    /// Validates and writes `bytes`, naming the file after its content hash and sanitised name.
    /// Re-uploading identical content under the same name overwrites the same file.
    pub(crate) async fn save(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredUpload, UploadError> {
        self.validate(original_name, bytes.len())?;

        let digest = hex::encode(Sha256::digest(bytes));
        let file_name =
            format!("{}_{}", &digest[..HASH_PREFIX_LEN], sanitized_filename(original_name));

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::info!(file_name = %file_name, size = bytes.len(), "Stored uploaded file");

        let public_path = format!("{}/{}", self.url_prefix, file_name);
        Ok(StoredUpload { file_name, public_path })
    }
}

fn file_extension(name: &str) -> Option<String> {
    Path::new(name.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Keeps only the final path component and characters that are safe in a URL and file name.
pub(crate) fn sanitized_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let sanitized: String = base
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();
    let sanitized = sanitized.trim_start_matches('.');

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: PathBuf) -> UploadStore {
        UploadStore {
            root,
            url_prefix: "/static/materials".to_string(),
            max_bytes: 1024,
            max_size_mb: 1,
            allowed_extensions: ["pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let store = store(std::env::temp_dir());
        assert!(store.validate("Notes.PDF", 10).is_ok());
        assert!(store.validate("slides.pptx", 10).is_ok());
        assert!(matches!(
            store.validate("malware.exe", 10),
            Err(UploadError::ExtensionNotAllowed(ext)) if ext == "exe"
        ));
        assert!(matches!(store.validate("README", 10), Err(UploadError::MissingName)));
    }

    #[test]
    fn size_limits_are_enforced() {
        let store = store(std::env::temp_dir());
        assert!(matches!(store.validate("a.pdf", 0), Err(UploadError::Empty)));
        assert!(matches!(store.validate("a.pdf", 2048), Err(UploadError::TooLarge { .. })));
        assert!(store.validate("a.pdf", 1024).is_ok());
    }

    #[test]
    fn sanitizer_strips_directories_and_odd_characters() {
        assert_eq!(sanitized_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitized_filename("C:\\docs\\Term 1 notes.pdf"), "Term_1_notes.pdf");
        assert_eq!(sanitized_filename("..."), "upload");
        assert_eq!(sanitized_filename("résumé.doc"), "rsum.doc");
    }

    #[tokio::test]
    async fn save_writes_hash_prefixed_file() {
        let root = std::env::temp_dir().join(format!("portal-uploads-{}", uuid::Uuid::new_v4()));
        let store = store(root.clone());

        let stored = store.save("Chapter 1.pdf", b"%PDF-1.4 body").await.expect("save");
        assert!(stored.file_name.ends_with("_Chapter_1.pdf"));
        assert_eq!(stored.file_name.find('_'), Some(HASH_PREFIX_LEN));
        assert_eq!(stored.public_path, format!("/static/materials/{}", stored.file_name));

        let written = tokio::fs::read(root.join(&stored.file_name)).await.expect("read back");
        assert_eq!(written, b"%PDF-1.4 body");

        let again = store.save("Chapter 1.pdf", b"%PDF-1.4 body").await.expect("save again");
        assert_eq!(again, stored);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
