/**
 * Routes Module
 * Public pages, admin handlers and the JSON page payloads they render
 */
pub mod auth;
pub mod beneficiaries;
pub mod flash;
pub mod form;
pub mod gallery;
pub mod health;
pub mod home;
pub mod news;

use axum::{
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use flash::{consume_flash_cookie, FlashMessage, IncomingFlash};

pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// A rendered view: the page data plus the pending flash, if any.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<FlashMessage>,
}

/// Render `body`, showing and consuming the incoming flash.
pub fn render<T: Serialize>(flash: IncomingFlash, body: T) -> Response {
    let page = Page {
        body,
        flash: flash.0.map(|f| f.to_message()),
    };

    if page.flash.is_some() {
        (AppendHeaders([(SET_COOKIE, consume_flash_cookie())]), Json(page)).into_response()
    } else {
        Json(page).into_response()
    }
}
