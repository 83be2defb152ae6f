//! Runtime configuration loaded from environment variables (and `.env`).

use bcrypt::{hash, DEFAULT_COST};
use rand::distr::{Alphanumeric, SampleString};
use std::path::PathBuf;

use crate::auth::AdminCredentials;
use crate::db::DbConfig;
use crate::error::{AppError, AppResult};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Flask's common `MAX_CONTENT_LENGTH` of 16 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_SESSION_TTL_HOURS: i64 = 12;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 30;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC key for session tokens.
    pub secret: String,
    /// Clamped to 1 hour..30 days when read from the environment.
    pub ttl_hours: i64,
    /// Add `Secure` to the session cookie. The flash cookie only carries a
    /// message code and is never marked `Secure`.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database: DbConfig,
    pub news_file: PathBuf,
    pub gallery_file: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub admin: AdminCredentials,
    pub session: SessionConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Ok("1" | "true" | "yes")
    )
}

fn clamp_ttl_hours(hours: i64) -> i64 {
    hours.clamp(1, MAX_SESSION_TTL_HOURS)
}

/// Random alphanumeric key, used when no `SESSION_SECRET` is configured.
pub fn generate_secret() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 64)
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let environment = env_or("ENVIRONMENT", "development");
        let is_production = environment == "production";

        let data_dir = PathBuf::from(env_or("DATA_DIR", "."));
        let news_file = std::env::var("NEWS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("news.json"));
        let gallery_file = std::env::var("GALLERY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("gallery.json"));

        let admin = Self::admin_from_env(is_production)?;

        let secret = match std::env::var("SESSION_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::info!(
                    "SESSION_SECRET not set; generated a per-process key, sessions end on restart"
                );
                generate_secret()
            }
        };

        Ok(Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse("PORT", 5000),
            environment,
            database: DbConfig::default(),
            news_file,
            gallery_file,
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            admin,
            session: SessionConfig {
                secret,
                ttl_hours: clamp_ttl_hours(env_parse(
                    "SESSION_TTL_HOURS",
                    DEFAULT_SESSION_TTL_HOURS,
                )),
                secure_cookie: env_flag("SESSION_COOKIE_SECURE"),
            },
        })
    }

    fn admin_from_env(is_production: bool) -> AppResult<AdminCredentials> {
        let username = env_or("ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME);

        let password_hash = if let Ok(hashed) = std::env::var("ADMIN_PASSWORD_HASH") {
            // Reject malformed hashes now rather than on the first login.
            hashed.parse::<bcrypt::HashParts>().map_err(|e| {
                AppError::Config(format!("ADMIN_PASSWORD_HASH is not a bcrypt hash: {e}"))
            })?;
            hashed
        } else {
            let plain = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
                if is_production {
                    tracing::warn!(
                        "SECURITY: neither ADMIN_PASSWORD_HASH nor ADMIN_PASSWORD is set; \
                         falling back to the insecure default password"
                    );
                }
                DEFAULT_ADMIN_PASSWORD.to_string()
            });
            hash(plain, DEFAULT_COST)
                .map_err(|e| AppError::Config(format!("failed to hash admin password: {e}")))?
        };

        if is_production && username == DEFAULT_ADMIN_USERNAME {
            tracing::warn!("SECURITY: ADMIN_USERNAME is using the default value");
        }

        Ok(AdminCredentials {
            username,
            password_hash,
        })
    }
}
