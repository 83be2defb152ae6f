use axum::{extract::State, response::Response};
use serde::Serialize;

use super::{flash::IncomingFlash, render};
use crate::db::{beneficiaries, models::Beneficiary};
use crate::error::AppResult;
use crate::state::AppState;
use crate::store::{GalleryImage, NewsArticle};

/// Number of news articles shown on the home page.
pub const HOME_NEWS_COUNT: usize = 3;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub beneficiaries: Vec<Beneficiary>,
    pub news: Vec<NewsArticle>,
    pub gallery: Vec<GalleryImage>,
}

/// GET / - beneficiaries, latest news and the gallery
pub async fn index(State(state): State<AppState>, flash: IncomingFlash) -> AppResult<Response> {
    let page = HomePage {
        beneficiaries: beneficiaries::list_all(&state.pool).await?,
        news: state.news.latest(HOME_NEWS_COUNT).await,
        gallery: state.gallery.list().await,
    };
    Ok(render(flash, page))
}
