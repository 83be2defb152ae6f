//! Helpers for the admin forms: multipart collection and field parsing.

use axum::{body::Bytes, extract::Multipart};
use std::collections::HashMap;

use crate::error::AppResult;
use crate::uploads::{StoredUpload, UploadDir, UploadError, UploadNaming};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// All parts of a `multipart/form-data` body, read into memory.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input.
                    if !file_name.is_empty() {
                        form.files.insert(name, UploadedFile { file_name, bytes });
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

/// Non-negative whole amount.
pub fn parse_amount(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|n| *n >= 0)
}

/// Trimmed, non-blank form value.
pub fn required(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Store an optional photo. A disallowed extension counts as no photo.
pub async fn store_optional_photo(
    uploads: &UploadDir,
    file: Option<&UploadedFile>,
    naming: UploadNaming,
) -> AppResult<Option<StoredUpload>> {
    let Some(file) = file else {
        return Ok(None);
    };

    match uploads.accept(&file.bytes, &file.file_name, naming).await {
        Ok(stored) => Ok(Some(stored)),
        Err(UploadError::DisallowedExtension(name)) => {
            tracing::info!(file_name = %name, "ignoring photo with disallowed extension");
            Ok(None)
        }
        Err(UploadError::Io(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500"), Some(500));
        assert_eq!(parse_amount(" 0 "), Some(0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("12.5"), None);
        assert_eq!(parse_amount("lots"), None);
    }

    #[test]
    fn test_required_rejects_blank() {
        assert_eq!(required("  Ana "), Some("Ana"));
        assert_eq!(required("   "), None);
    }

    #[tokio::test]
    async fn test_store_optional_photo_ignores_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        let file = UploadedFile {
            file_name: "virus.exe".to_string(),
            bytes: Bytes::from_static(b"MZ"),
        };

        let stored = store_optional_photo(&uploads, Some(&file), UploadNaming::Sanitized)
            .await
            .unwrap();
        assert!(stored.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
