use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::JsonListStore;
use crate::error::AppResult;

/// A gallery entry. `id` is the stored filename in the uploads directory, so
/// the record and the file must be removed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    pub description: String,
}

pub struct GalleryStore {
    list: JsonListStore<GalleryImage>,
}

impl GalleryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            list: JsonListStore::new(path),
        }
    }

    pub async fn list(&self) -> Vec<GalleryImage> {
        self.list.load().await
    }

    pub async fn add(&self, image: GalleryImage) -> AppResult<()> {
        let mut images = self.list.load().await;
        tracing::info!(id = %image.id, "gallery image added");
        images.push(image);
        self.list.save(&images).await
    }

    /// Drop the record with `id`, returning how many were removed.
    pub async fn remove(&self, id: &str) -> AppResult<usize> {
        let mut images = self.list.load().await;
        let before = images.len();
        images.retain(|img| img.id != id);
        let removed = before - images.len();
        self.list.save(&images).await?;

        tracing::info!(id, removed, "gallery image removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str) -> GalleryImage {
        GalleryImage {
            id: id.to_string(),
            url: format!("/uploads/{id}"),
            description: format!("photo {id}"),
        }
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = GalleryStore::new(dir.path().join("gallery.json"));

        gallery.add(image("a.png")).await.unwrap();
        gallery.add(image("b.png")).await.unwrap();

        assert_eq!(gallery.list().await, vec![image("a.png"), image("b.png")]);
    }

    #[tokio::test]
    async fn test_remove_filters_matching_record() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = GalleryStore::new(dir.path().join("gallery.json"));
        gallery.add(image("a.png")).await.unwrap();
        gallery.add(image("b.png")).await.unwrap();

        assert_eq!(gallery.remove("a.png").await.unwrap(), 1);
        assert_eq!(gallery.list().await, vec![image("b.png")]);
        assert_eq!(gallery.remove("a.png").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = GalleryStore::new(dir.path().join("gallery.json"));
        assert!(gallery.list().await.is_empty());
    }
}
