use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::auth::signed_request::SignedRequest;
use crate::error::AppError;

/// Name of the encrypted session cookie.
pub const SESSION_COOKIE: &str = "worklink_session";

/// Everything kept between requests for one user agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// The authenticated local user, if any.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Pending account link, set when a signed request is received and
    /// removed once the link is confirmed.
    #[serde(default)]
    pub signed_request: Option<SignedRequest>,
}

impl SessionData {
    /// Read the session from the jar. A missing or undecodable cookie yields
    /// an empty session.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Self::default();
        };

        serde_json::from_str(cookie.value()).unwrap_or_else(|e| {
            tracing::debug!("Discarding unreadable session cookie: {e}");
            Self::default()
        })
    }

    /// Write the session back into the jar.
    pub fn store(&self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, AppError> {
        let value = serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(14))
            .build();

        Ok(jar.add(cookie))
    }
}

/// Derive the cookie encryption key from the configured secret.
pub fn derive_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
