/**
 * Authentication Routes
 * Admin login, logout and the login page
 */
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use super::{
    flash::{redirect_with_flash, Flash, IncomingFlash},
    render, DASHBOARD_PATH,
};
use crate::auth::{
    self,
    guard::LOGIN_PATH,
    session::{issue_token, validate_token},
    SESSION_COOKIE,
};
use crate::cookies::{cookie_value, expire_cookie, set_cookie};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {}

/// GET /admin/login
pub async fn login_page(flash: IncomingFlash) -> Response {
    render(flash, LoginPage {})
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if !auth::authenticate(&state.config.admin, &form.username, &form.password).await {
        tracing::warn!(username = %form.username, "failed admin login attempt");
        return Ok(redirect_with_flash(LOGIN_PATH, Flash::InvalidCredentials));
    }

    let session = &state.config.session;
    let (token, claims) = issue_token(&form.username, session)?;
    state.sessions.insert(&claims).await;

    tracing::info!(username = %claims.sub, "admin logged in");

    let cookie = set_cookie(
        SESSION_COOKIE,
        &token,
        Some(session.ttl_hours * 3600),
        session.secure_cookie,
    );
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(DASHBOARD_PATH)).into_response())
}

/// GET /admin/logout - always succeeds, even without a session
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = &state.config.session;

    if let Some(claims) = cookie_value(&headers, SESSION_COOKIE)
        .and_then(|token| validate_token(token, session).ok())
    {
        if state.sessions.remove(&claims.jti).await {
            tracing::info!(username = %claims.sub, "admin logged out");
        }
    }

    (
        AppendHeaders([(SET_COOKIE, expire_cookie(SESSION_COOKIE, session.secure_cookie))]),
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
