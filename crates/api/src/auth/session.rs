//! Opaque session tokens and the session cookie.
//!
//! A login issues a random token that the browser keeps in an `HttpOnly`
//! cookie. Only the token's SHA-256 hash is stored server-side, so a
//! database leak does not hand out live sessions.

use std::fmt;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "kevs_session";

/// Default session lifetime in hours (one week).
const DEFAULT_TTL_HOURS: i64 = 168;

/// `SameSite` attribute of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lax" => Some(Self::Lax),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        })
    }
}

/// Configuration for session lifetime and cookie attributes.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in hours (default: 168).
    pub ttl_hours: i64,
    /// Add the `Secure` attribute (HTTPS-only cookie).
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL_HOURS,
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `SESSION_TTL_HOURS`       | `168`   |
    /// | `SESSION_COOKIE_SECURE`   | `false` |
    /// | `SESSION_COOKIE_SAMESITE` | `Lax`   |
    ///
    /// # Panics
    ///
    /// Panics if any variable is set to an unparsable value.
    pub fn from_env() -> Self {
        let ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_TTL_HOURS.to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");
        assert!(ttl_hours > 0, "SESSION_TTL_HOURS must be positive");

        let same_site = match std::env::var("SESSION_COOKIE_SAMESITE") {
            Ok(raw) => SameSite::parse(&raw)
                .expect("SESSION_COOKIE_SAMESITE must be Strict, Lax or None"),
            Err(_) => SameSite::Lax,
        };

        Self {
            ttl_hours,
            cookie_secure: crate::config::env_flag("SESSION_COOKIE_SECURE", false),
            same_site,
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }

    /// `Set-Cookie` value that stores `token` in the browser.
    pub fn cookie_for(&self, token: &str) -> String {
        self.cookie_with(token, self.ttl_hours * 3600)
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn expired_cookie(&self) -> String {
        self.cookie_with("", 0)
    }

    fn cookie_with(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite={}; Max-Age={max_age_secs}",
            self.same_site
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Generate a random session token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext is
/// sent to the client; only the hash should be persisted server-side.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().simple().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extract the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_token_hash_matches() {
        let (plaintext, hash) = generate_session_token();

        assert_eq!(hash, hash_session_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_ne!(plaintext, generate_session_token().0);
    }

    #[test]
    fn test_cookie_attributes() {
        let config = SessionConfig::default();
        let cookie = config.cookie_for("abc");

        assert!(cookie.starts_with("kevs_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_secure_and_expired_cookie() {
        let config = SessionConfig {
            cookie_secure: true,
            same_site: SameSite::Strict,
            ..SessionConfig::default()
        };
        let cookie = config.expired_cookie();

        assert!(cookie.starts_with("kevs_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_token_from_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; kevs_session=tok123"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok123"));

        let mut split = HeaderMap::new();
        split.append(COOKIE, HeaderValue::from_static("a=1"));
        split.append(COOKIE, HeaderValue::from_static("kevs_session=second"));
        assert_eq!(token_from_headers(&split).as_deref(), Some("second"));
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("kevs_session=; other=x"));
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("none"), Some(SameSite::None));
        assert_eq!(SameSite::parse(" STRICT "), Some(SameSite::Strict));
        assert_eq!(SameSite::parse("sideways"), None);
    }
}
