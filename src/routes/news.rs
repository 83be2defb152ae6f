/**
 * News Routes
 * Admin management of news articles
 */
use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::{Deserialize, Serialize};

use super::{
    flash::{redirect_with_flash, Flash, IncomingFlash},
    form::required,
    render,
};
use crate::auth::AdminSession;
use crate::error::AppResult;
use crate::state::AppState;
use crate::store::NewsArticle;

const NEWS_PATH: &str = "/admin/news";

#[derive(Debug, Deserialize)]
pub struct NewsForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NewsPage {
    pub news: Vec<NewsArticle>,
}

/// GET /admin/news
pub async fn manage(
    _admin: AdminSession,
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> Response {
    let page = NewsPage {
        news: state.news.list_newest_first().await,
    };
    render(flash, page)
}

/// POST /admin/news
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<NewsForm>,
) -> AppResult<Response> {
    let (Some(title), Some(content)) = (required(&form.title), required(&form.content)) else {
        return Ok(redirect_with_flash(NEWS_PATH, Flash::MissingFields));
    };

    state.news.create(title.to_string(), content.to_string()).await?;
    Ok(redirect_with_flash(NEWS_PATH, Flash::NewsAdded))
}

/// GET /admin/news/delete/{id} - unknown ids are a no-op
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    state.news.delete(id).await?;
    Ok(redirect_with_flash(NEWS_PATH, Flash::NewsDeleted))
}
