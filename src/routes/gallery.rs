/**
 * Gallery Routes
 * Admin upload and removal of gallery photos
 */
use axum::{
    extract::{Multipart, Path, State},
    response::Response,
};
use serde::Serialize;

use super::{
    flash::{redirect_with_flash, Flash, IncomingFlash},
    form::MultipartForm,
    render,
};
use crate::auth::AdminSession;
use crate::error::AppResult;
use crate::state::AppState;
use crate::store::GalleryImage;
use crate::uploads::{UploadError, UploadNaming};

const GALLERY_PATH: &str = "/admin/gallery";

#[derive(Debug, Serialize)]
pub struct GalleryPage {
    pub gallery: Vec<GalleryImage>,
}

/// GET /admin/gallery
pub async fn manage(
    _admin: AdminSession,
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> Response {
    let page = GalleryPage {
        gallery: state.gallery.list().await,
    };
    render(flash, page)
}

/// POST /admin/gallery
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = MultipartForm::read(multipart).await?;

    let Some(photo) = form.file("photo") else {
        return Ok(redirect_with_flash(GALLERY_PATH, Flash::PhotoRequired));
    };

    let stored = match state
        .uploads
        .accept(&photo.bytes, &photo.file_name, UploadNaming::UniquePrefix)
        .await
    {
        Ok(stored) => stored,
        Err(UploadError::DisallowedExtension(name)) => {
            tracing::info!(file_name = %name, "rejected gallery upload");
            return Ok(redirect_with_flash(GALLERY_PATH, Flash::DisallowedFileType));
        }
        Err(UploadError::Io(e)) => return Err(e.into()),
    };

    state
        .gallery
        .add(GalleryImage {
            id: stored.filename,
            url: stored.url,
            description: form.text("description").unwrap_or_default().to_string(),
        })
        .await?;

    Ok(redirect_with_flash(GALLERY_PATH, Flash::GalleryImageAdded))
}

/// GET /admin/gallery/delete/{image_id}
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> AppResult<Response> {
    // A missing file must not keep the record alive.
    state.uploads.remove(&image_id).await;
    state.gallery.remove(&image_id).await?;
    Ok(redirect_with_flash(GALLERY_PATH, Flash::GalleryImageDeleted))
}
