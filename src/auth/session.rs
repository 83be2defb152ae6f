//! Signed admin session tokens and the server-side registry of live sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SessionConfig;

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // Admin username
    pub iat: i64,
    pub exp: i64,
    pub jti: String, // Session id, looked up in SessionRegistry
}

pub fn issue_token(
    username: &str,
    config: &SessionConfig,
) -> Result<(String, SessionClaims), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.ttl_hours)).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Verify signature and expiry.
pub fn validate_token(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Session ids that are currently logged in, with their expiry timestamps.
///
/// A valid signature alone is not enough: logout removes the id here, which
/// invalidates the token even though it has not expired yet.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: RwLock<HashMap<String, i64>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, claims: &SessionClaims) {
        let now = Utc::now().timestamp();
        let mut active = self.active.write().await;
        // Expired sessions are never looked up again.
        active.retain(|_, exp| *exp > now);
        active.insert(claims.jti.clone(), claims.exp);
    }

    pub async fn contains(&self, jti: &str) -> bool {
        self.active.read().await.contains_key(jti)
    }

    /// Returns whether the session was active.
    pub async fn remove(&self, jti: &str) -> bool {
        self.active.write().await.remove(jti).is_some()
    }

    pub async fn len(&self) -> usize {
        self.active.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> SessionConfig {
        SessionConfig {
            secret: secret.to_string(),
            ttl_hours: 1,
            secure_cookie: false,
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let cfg = config("test-secret-that-is-long-enough");
        let (token, issued) = issue_token("admin", &cfg).unwrap();

        let claims = validate_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.jti, issued.jti);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let (token, _) = issue_token("admin", &config("secret-alpha")).unwrap();
        assert!(validate_token(&token, &config("secret-bravo")).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let cfg = config("test-secret");
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "admin".to_string(),
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &cfg).is_err());
    }

    #[tokio::test]
    async fn test_registry_insert_contains_remove() {
        let registry = SessionRegistry::new();
        let (_, claims) = issue_token("admin", &config("s")).unwrap();

        registry.insert(&claims).await;
        assert!(registry.contains(&claims.jti).await);

        assert!(registry.remove(&claims.jti).await);
        assert!(!registry.contains(&claims.jti).await);
        assert!(!registry.remove(&claims.jti).await);
    }

    #[tokio::test]
    async fn test_registry_prunes_expired_sessions_on_insert() {
        let registry = SessionRegistry::new();
        let stale = SessionClaims {
            sub: "admin".to_string(),
            iat: 0,
            exp: 1,
            jti: "stale".to_string(),
        };
        registry.active.write().await.insert(stale.jti.clone(), stale.exp);

        let (_, fresh) = issue_token("admin", &config("s")).unwrap();
        registry.insert(&fresh).await;

        assert_eq!(registry.len().await, 1);
        assert!(!registry.contains("stale").await);
    }
}
