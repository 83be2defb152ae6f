//! JSON-file-backed stores for news articles and gallery images.
//!
//! Each file holds one JSON array that is read and rewritten in full on every
//! change. There is no locking: two requests doing load-modify-save at the same
//! time can lose one of the updates.

pub mod gallery;
pub mod json_list;
pub mod news;

pub use gallery::{GalleryImage, GalleryStore};
pub use json_list::JsonListStore;
pub use news::{NewsArticle, NewsStore};
