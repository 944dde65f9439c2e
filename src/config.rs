//! Runtime-mutable connection settings shared by every request of a client.

use crate::{Error, Result};
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://eposte.up.railway.app";

/// Base URL and bearer token as seen by one request.
///
/// A snapshot is taken when a request starts, so changing the token while a
/// request is in flight does not alter that request's headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub base_url: Url,
    pub auth_token: Option<String>,
}

/// Normalizes and validates a base URL.
///
/// Surrounding whitespace and slashes are trimmed; the result must be an
/// absolute URL that can carry a path.
///
/// # Examples
///
/// ```
/// use poste_client::config::parse_base_url;
///
/// let url = parse_base_url("  https://api.example.com/  ").unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/");
/// assert!(parse_base_url("not a url").is_err());
/// ```
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_matches('/');
    let url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!("{} cannot be a base URL", trimmed)));
    }
    Ok(url)
}

/// Renders a base URL without its trailing slash.
pub(crate) fn display_base_url(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

/// Shared, lock-guarded [`TransportConfig`].
///
/// One lock covers both fields so a reader never observes a base URL from
/// one write paired with a token from another.
#[derive(Debug)]
pub(crate) struct SharedConfig {
    inner: RwLock<TransportConfig>,
}

impl SharedConfig {
    pub(crate) fn new(config: TransportConfig) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    pub(crate) fn snapshot(&self) -> TransportConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_base_url(&self, url: Url) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url = url;
    }

    pub(crate) fn set_auth_token(&self, token: Option<String>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .auth_token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_and_leading_slashes_are_trimmed() {
        let url = parse_base_url("https://api.example.com/v1///").unwrap();
        assert_eq!(display_base_url(&url), "https://api.example.com/v1");

        let url = parse_base_url("/https://api.example.com/").unwrap();
        assert_eq!(display_base_url(&url), "https://api.example.com");
    }

    #[test]
    fn relative_and_opaque_urls_are_rejected() {
        assert!(matches!(
            parse_base_url("api.example.com"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(parse_base_url("   "), Err(Error::InvalidUrl(_))));
        assert!(matches!(
            parse_base_url("data:text/plain,hello"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let shared = SharedConfig::new(TransportConfig {
            base_url: parse_base_url(DEFAULT_BASE_URL).unwrap(),
            auth_token: Some("old".to_string()),
        });

        let before = shared.snapshot();
        shared.set_auth_token(Some("new".to_string()));
        shared.set_base_url(parse_base_url("https://other.example.com").unwrap());

        assert_eq!(before.auth_token.as_deref(), Some("old"));
        assert_eq!(display_base_url(&before.base_url), DEFAULT_BASE_URL);

        let after = shared.snapshot();
        assert_eq!(after.auth_token.as_deref(), Some("new"));
        assert_eq!(display_base_url(&after.base_url), "https://other.example.com");
    }
}
