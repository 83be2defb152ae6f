use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::JsonListStore;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: u64,
    pub title: String,
    pub content: String,
}

/// News articles kept in `news.json`.
///
/// Ids are random 64-bit values, so sorting by id is only a stand-in for
/// recency. Gallery images use their stored filename as id instead.
pub struct NewsStore {
    list: JsonListStore<NewsArticle>,
}

impl NewsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            list: JsonListStore::new(path),
        }
    }

    pub async fn list_newest_first(&self) -> Vec<NewsArticle> {
        let mut articles = self.list.load().await;
        articles.sort_by(|a, b| b.id.cmp(&a.id));
        articles
    }

    pub async fn latest(&self, count: usize) -> Vec<NewsArticle> {
        let mut articles = self.list_newest_first().await;
        articles.truncate(count);
        articles
    }

    pub async fn create(&self, title: String, content: String) -> AppResult<NewsArticle> {
        let mut articles = self.list.load().await;
        let article = NewsArticle {
            id: generate_news_id(),
            title,
            content,
        };
        articles.push(article.clone());
        self.list.save(&articles).await?;

        tracing::info!(id = article.id, title = %article.title, "news article created");
        Ok(article)
    }

    /// Remove every article with `id`, returning how many were dropped.
    pub async fn delete(&self, id: u64) -> AppResult<usize> {
        let mut articles = self.list.load().await;
        let before = articles.len();
        articles.retain(|a| a.id != id);
        let removed = before - articles.len();
        self.list.save(&articles).await?;

        tracing::info!(id, removed, "news article deleted");
        Ok(removed)
    }
}

/// Low 64 bits of a v4 UUID; never zero.
fn generate_news_id() -> u64 {
    loop {
        let id = Uuid::new_v4().as_u128() as u64;
        if id != 0 {
            return id;
        }
    }
}
