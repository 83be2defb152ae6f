use std::sync::Arc;

use crate::auth::SessionRegistry;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::store::{GalleryStore, NewsStore};
use crate::uploads::UploadDir;

/// Shared application context handed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub news: Arc<NewsStore>,
    pub gallery: Arc<GalleryStore>,
    pub uploads: Arc<UploadDir>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: DbPool) -> Self {
        Self {
            pool,
            news: Arc::new(NewsStore::new(&config.news_file)),
            gallery: Arc::new(GalleryStore::new(&config.gallery_file)),
            uploads: Arc::new(UploadDir::new(&config.upload_dir)),
            sessions: Arc::new(SessionRegistry::new()),
            config: Arc::new(config),
        }
    }
}
