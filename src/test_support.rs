//! Shared fixtures for router tests: an isolated app state and request builders.

use axum::{
    body::{Body, Bytes},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, Request, StatusCode,
    },
    Router,
};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::auth::{session::issue_token, AdminCredentials, SESSION_COOKIE};
use crate::config::{AppConfig, SessionConfig};
use crate::db::{self, DbConfig};
use crate::state::AppState;

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "correct-horse";

const BOUNDARY: &str = "donation-site-test-boundary";

pub struct TestApp {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like `new`, with `adjust` applied to the config first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            database: DbConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                acquire_timeout_secs: 3,
                idle_timeout_secs: 60,
            },
            news_file: dir.path().join("news.json"),
            gallery_file: dir.path().join("gallery.json"),
            upload_dir: dir.path().join("uploads"),
            max_upload_bytes: 1024 * 1024,
            admin: AdminCredentials {
                username: TEST_USERNAME.to_string(),
                password_hash: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
            },
            session: SessionConfig {
                secret: "test-session-secret".to_string(),
                ttl_hours: 1,
                secure_cookie: false,
            },
        };

        adjust(&mut config);

        let state = AppState::new(config, db::test_pool().await);
        state.uploads.ensure_exists().await.unwrap();
        TestApp { state, dir }
    }

    pub fn router(&self) -> Router {
        crate::create_app(self.state.clone())
    }

    /// `Cookie` header value for a registered admin session.
    pub async fn admin_cookie(&self) -> String {
        let (token, claims) = issue_token(TEST_USERNAME, &self.state.config.session).unwrap();
        self.state.sessions.insert(&claims).await;
        format!("{SESSION_COOKIE}={token}")
    }

    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.state.uploads.root().join(filename)
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(self.state.uploads.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

#[derive(Clone, Copy)]
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_multipart(uri: &str, cookie: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; \
                         filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::post(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(CONTENT_LENGTH, body.len());
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn send(router: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let res = router.oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes)
}

pub fn location(headers: &HeaderMap) -> &str {
    headers[LOCATION].to_str().unwrap()
}

/// Every `Set-Cookie` header, as strings.
pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn json(bytes: &Bytes) -> serde_json::Value {
    serde_json::from_slice(bytes).unwrap()
}
