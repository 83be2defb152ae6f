//! Image uploads: extension allow-list, safe storage names and removal.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Route prefix the uploads directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file type not allowed: {0:?}")]
    DisallowedExtension(String),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// How the stored filename is derived from the client's filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadNaming {
    /// Sanitized original name. A later upload with the same name overwrites it.
    Sanitized,
    /// Sanitized `<uuid>_<original>`, unique per upload.
    UniquePrefix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub url: String,
}

/// Lower-cased extension after the last `.`, if any.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// non-ASCII is dropped and leading/trailing dots and underscores are
/// stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c: char| c == '.' || c == '_')
        .to_string()
}

pub fn public_url(filename: &str) -> String {
    format!("{}/{}", PUBLIC_PREFIX, filename)
}

/// A single normal path component, so joining it onto the uploads root
/// cannot leave that directory. Inner dots (`my..photo.png`) are fine.
fn is_plain_filename(filename: &str) -> bool {
    if filename.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// The directory uploaded images are written to and served from.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_exists(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Validate and store an uploaded file.
    ///
    /// Nothing is written when the extension is not allowed.
    pub async fn accept(
        &self,
        bytes: &[u8],
        original_name: &str,
        naming: UploadNaming,
    ) -> Result<StoredUpload, UploadError> {
        if !allowed_file(original_name) {
            return Err(UploadError::DisallowedExtension(original_name.to_string()));
        }

        let filename = storage_name(original_name, naming);
        tokio::fs::write(self.root.join(&filename), bytes).await?;

        tracing::info!(
            original = %original_name,
            filename = %filename,
            size = bytes.len(),
            "upload stored"
        );

        Ok(StoredUpload {
            url: public_url(&filename),
            filename,
        })
    }

    /// Delete a stored file. Failures are logged and otherwise ignored.
    ///
    /// Returns whether a file was actually removed.
    pub async fn remove(&self, filename: &str) -> bool {
        if !is_plain_filename(filename) {
            tracing::warn!(filename = %filename, "refusing to delete upload with unsafe name");
            return false;
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => {
                tracing::info!(filename = %filename, "upload deleted");
                true
            }
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "failed to delete upload");
                false
            }
        }
    }
}

fn storage_name(original_name: &str, naming: UploadNaming) -> String {
    let candidate = match naming {
        UploadNaming::Sanitized => secure_filename(original_name),
        UploadNaming::UniquePrefix => {
            secure_filename(&format!("{}_{}", Uuid::new_v4(), original_name))
        }
    };

    if allowed_file(&candidate) {
        return candidate;
    }

    // Sanitizing ate the stem (e.g. a fully non-ASCII name).
    let ext = extension(original_name).unwrap_or_default();
    format!("{}.{}", Uuid::new_v4(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file_is_case_insensitive() {
        assert!(allowed_file("photo.PNG"));
        assert!(allowed_file("photo.Jpeg"));
        assert!(allowed_file("archive.tar.gif"));
        assert!(!allowed_file("virus.exe"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("photo.png.exe"));
    }

    #[test]
    fn test_secure_filename_strips_paths_and_unsafe_characters() {
        assert_eq!(secure_filename("My cool photo.jpg"), "My_cool_photo.jpg");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\photos\\kid.png"), "C_photos_kid.png");
        assert_eq!(secure_filename("a$b%c.gif"), "abc.gif");
        assert_eq!(secure_filename("ანა.png"), "png");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_storage_name_falls_back_when_stem_is_lost() {
        let name = storage_name("ანა.png", UploadNaming::Sanitized);
        assert!(name.ends_with(".png"));
        assert!(name.len() > ".png".len());
    }

    #[test]
    fn test_unique_prefix_names_differ() {
        let a = storage_name("kid.png", UploadNaming::UniquePrefix);
        let b = storage_name("kid.png", UploadNaming::UniquePrefix);
        assert_ne!(a, b);
        assert!(a.ends_with("_kid.png"));
    }

    #[tokio::test]
    async fn test_accept_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());

        let stored = uploads
            .accept(b"\x89PNG", "kid photo.png", UploadNaming::Sanitized)
            .await
            .unwrap();

        assert_eq!(stored.filename, "kid_photo.png");
        assert_eq!(stored.url, "/uploads/kid_photo.png");
        assert_eq!(std::fs::read(dir.path().join("kid_photo.png")).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_accept_rejects_disallowed_extension_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());

        let result = uploads
            .accept(b"MZ", "virus.exe", UploadNaming::Sanitized)
            .await;

        assert!(matches!(result, Err(UploadError::DisallowedExtension(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        assert!(!uploads.remove("gone.png").await);
    }

    #[tokio::test]
    async fn test_remove_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("uploads");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();

        let uploads = UploadDir::new(&inner);
        assert!(!uploads.remove("../secret.txt").await);
        assert!(dir.path().join("secret.txt").exists());
    }

    #[test]
    fn test_plain_filename_allows_inner_dots_only() {
        assert!(is_plain_filename("my..photo.png"));
        assert!(is_plain_filename("kid.png"));
        assert!(!is_plain_filename(".."));
        assert!(!is_plain_filename("."));
        assert!(!is_plain_filename(""));
        assert!(!is_plain_filename("../kid.png"));
        assert!(!is_plain_filename("a/b.png"));
        assert!(!is_plain_filename("a\\b.png"));
        assert!(!is_plain_filename("kid\0.png"));
    }

    #[tokio::test]
    async fn test_remove_deletes_name_with_consecutive_dots() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        let stored = uploads
            .accept(b"PNG", "my..photo.png", UploadNaming::UniquePrefix)
            .await
            .unwrap();
        assert!(stored.filename.ends_with("_my..photo.png"));

        assert!(uploads.remove(&stored.filename).await);
        assert!(!dir.path().join(&stored.filename).exists());
    }

    #[tokio::test]
    async fn test_ensure_exists_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path().join("a").join("b"));
        uploads.ensure_exists().await.unwrap();
        assert!(uploads.root().is_dir());
    }
}
