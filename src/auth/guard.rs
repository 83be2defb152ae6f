//! Session guard extractor for admin handlers.

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};

use super::session::{validate_token, SessionClaims, SESSION_COOKIE};
use crate::cookies::cookie_value;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/admin/login";

/// A logged-in admin, taken from the `admin_session` cookie.
///
/// Every admin handler takes this as its first argument. Without a valid,
/// still-registered session the request is redirected to the login page.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub claims: SessionClaims,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| Redirect::to(LOGIN_PATH))?;

        let claims = validate_token(token, &state.config.session).map_err(|e| {
            tracing::debug!(error = %e, "rejected admin session token");
            Redirect::to(LOGIN_PATH)
        })?;

        if !state.sessions.contains(&claims.jti).await {
            tracing::debug!(jti = %claims.jti, "admin session is no longer active");
            return Err(Redirect::to(LOGIN_PATH));
        }

        Ok(AdminSession { claims })
    }
}
