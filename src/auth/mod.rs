/*!
 * Admin authentication
 * Credential check, signed session tokens and the request guard
 */
pub mod guard;
pub mod session;

pub use guard::AdminSession;
pub use session::{SessionClaims, SessionRegistry, SESSION_COOKIE};

use bcrypt::verify;

/// The single admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// bcrypt hash of the admin password.
    pub password_hash: String,
}

/// Check a login attempt. The caller reports a failure without saying which
/// field was wrong.
pub async fn authenticate(credentials: &AdminCredentials, username: &str, password: &str) -> bool {
    let username_ok = username == credentials.username;

    // bcrypt is CPU-bound; keep it off the async executor.
    let password = password.to_string();
    let hash = credentials.password_hash.clone();
    let password_ok = tokio::task::spawn_blocking(move || verify(&password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false);

    username_ok && password_ok
}
