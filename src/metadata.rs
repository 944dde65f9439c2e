//! Request metadata and URL composition.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Everything but RFC 3986 unreserved characters gets escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path segments additionally keep `@` so emails stay readable.
const SEGMENT: &AsciiSet = &COMPONENT.remove(b'@');

/// Metadata for an individual HTTP request.
///
/// Query parameters keep insertion order; the server sees them exactly as
/// they were added.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path (relative to the base URL).
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters for this request, in order.
    pub query_params: Vec<(String, String)>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Appends a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Appends a query parameter only when `value` is present and non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use poste_client::metadata::RequestMetadata;
    /// use http::Method;
    ///
    /// let metadata = RequestMetadata::new(Method::GET, "/api/v1/folders")
    ///     .with_optional_query_param("pageSize", Some(20))
    ///     .with_optional_query_param("after", None::<&str>)
    ///     .with_optional_query_param("folderId", Some(""));
    ///
    /// assert_eq!(metadata.query_params, vec![("pageSize".to_string(), "20".to_string())]);
    /// ```
    pub fn with_optional_query_param<V: ToString>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value.map(|v| v.to_string()) {
            Some(value) if !value.is_empty() => self.with_query_param(key, value),
            _ => self,
        }
    }

    /// Resolves this request's path and query against `base`.
    pub fn url(&self, base: &Url) -> Result<Url> {
        build_url(base, &self.path, &self.query_params)
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}

/// Composes the absolute URL for a request.
///
/// One leading `/` is stripped from `path` and the base URL's own path is
/// trimmed of slashes, so `"/x"` and `"x"` resolve to the same URL and a base
/// path like `/v2/` is kept as a prefix. Query keys and values are
/// percent-encoded and appended in the order given.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `base` cannot carry a path.
///
/// # Examples
///
/// ```
/// use poste_client::metadata::build_url;
/// use url::Url;
///
/// let base = Url::parse("https://api.example.com/").unwrap();
/// let query = vec![("after".to_string(), "a b".to_string())];
///
/// let url = build_url(&base, "/api/v1/posts", &query).unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/api/v1/posts?after=a%20b");
/// ```
pub fn build_url(base: &Url, path: &str, query: &[(String, String)]) -> Result<Url> {
    if base.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!("{} cannot be a base URL", base)));
    }

    let relative = path.strip_prefix('/').unwrap_or(path);
    let base_path = base.path().trim_matches('/');
    let joined = [base_path, relative]
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    let mut url = base.clone();
    url.set_path(&format!("/{}", joined));
    url.set_fragment(None);

    if query.is_empty() {
        url.set_query(None);
    } else {
        let encoded = query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, COMPONENT),
                    utf8_percent_encode(value, COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&encoded));
    }

    Ok(url)
}

/// Percent-encodes a single path segment such as an id or an email.
///
/// # Examples
///
/// ```
/// use poste_client::metadata::path_segment;
///
/// assert_eq!(path_segment("ada@example.com"), "ada@example.com");
/// assert_eq!(path_segment("a/b c"), "a%2Fb%20c");
/// ```
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn leading_slash_does_not_change_the_url() {
        let base = base("https://api.example.com");
        for path in ["api/v1/posts", "/api/v1/posts"] {
            assert_eq!(
                build_url(&base, path, &[]).unwrap().as_str(),
                "https://api.example.com/api/v1/posts"
            );
        }
    }

    #[test]
    fn base_path_is_kept_as_prefix() {
        let base = base("https://api.example.com/poste/");
        let url = build_url(&base, "/api/v1/folders", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/poste/api/v1/folders");
    }

    #[test]
    fn empty_path_resolves_to_base() {
        let url = build_url(&base("https://api.example.com/root/"), "", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/root");
    }

    #[test]
    fn query_keeps_insertion_order() {
        let query = pairs(&[("pageSize", "20"), ("after", "c1")]);
        let url = build_url(&base("https://api.example.com"), "/api/v1/folders", &query).unwrap();
        assert_eq!(url.query(), Some("pageSize=20&after=c1"));

        let query = pairs(&[("z", "1"), ("a", "2"), ("m", "3")]);
        let url = build_url(&base("https://api.example.com"), "x", &query).unwrap();
        assert_eq!(url.query(), Some("z=1&a=2&m=3"));
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let query = pairs(&[("after", "a b&c=d/e+f"), ("folderId", "ü")]);
        let url = build_url(&base("https://api.example.com"), "x", &query).unwrap();
        assert_eq!(
            url.query(),
            Some("after=a%20b%26c%3Dd%2Fe%2Bf&folderId=%C3%BC")
        );
    }

    #[test]
    fn base_query_and_fragment_are_dropped() {
        let url = build_url(&base("https://api.example.com/?debug=1#top"), "x", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/x");
    }

    #[test]
    fn opaque_base_is_rejected() {
        let err = build_url(&base("mailto:someone@example.com"), "x", &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn optional_params_skip_missing_values() {
        let metadata = RequestMetadata::new(Method::GET, "/api/v1/posts")
            .with_optional_query_param("folderId", None::<String>)
            .with_optional_query_param("pageSize", Some(5u32))
            .with_optional_query_param("after", Some("c2"));
        assert_eq!(metadata.query_params, pairs(&[("pageSize", "5"), ("after", "c2")]));
    }

    #[test]
    fn invalid_header_is_a_configuration_error() {
        let err = RequestMetadata::new(Method::GET, "/")
            .with_header("bad header", "v")
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
