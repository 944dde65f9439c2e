//! The request executor every Poste API call passes through.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure one at the application root, then hand clones (or the services
//! obtained from it) to whatever needs API access.

use crate::{
    codec::{decode_body, encode_body},
    config::{display_base_url, parse_base_url, SharedConfig, TransportConfig, DEFAULT_BASE_URL},
    metadata::RequestMetadata,
    services::{FolderService, HealthService, PostService},
    transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport},
    Error, Response, Result,
};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// A typed client for the Poste REST API.
///
/// Cloning is cheap and every clone shares the same transport and
/// configuration, so a token set through one clone applies to all of them.
/// Each call is a single attempt: failures surface immediately as an
/// [`Error`] and retrying is left to the caller.
///
/// # Examples
///
/// ```no_run
/// use poste_client::{dto::PostCreateDto, Client};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), poste_client::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// client.set_auth_token(Some("token-123".to_string()));
///
/// let page = client.posts().list_posts(None, Some(20), None).await?;
/// println!("{} posts, more: {}", page.len(), page.has_more());
///
/// let created = client
///     .posts()
///     .create_post(&PostCreateDto::new("f-1", "Rust", "https://rust-lang.org"))
///     .await?;
/// println!("Created post {}", created.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    config: SharedConfig,
    default_headers: HeaderMap,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the current base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        display_base_url(&self.inner.config.snapshot().base_url)
    }

    /// Replaces the base URL used by requests issued from now on.
    ///
    /// Whitespace and surrounding slashes are trimmed first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the value is not an absolute URL; the
    /// previous base URL stays in effect.
    pub fn set_base_url(&self, url: impl AsRef<str>) -> Result<()> {
        match parse_base_url(url.as_ref()) {
            Ok(parsed) => {
                tracing::debug!(base_url = %parsed, "Base URL updated");
                self.inner.config.set_base_url(parsed);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept = %self.base_url(),
                    "Rejected base URL"
                );
                Err(e)
            }
        }
    }

    /// Sets or removes the bearer token sent with every request.
    pub fn set_auth_token(&self, token: Option<String>) {
        self.inner.config.set_auth_token(token);
    }

    /// Removes the bearer token.
    pub fn clear_auth_token(&self) {
        self.inner.config.set_auth_token(None);
    }

    /// Returns `true` if a bearer token is configured.
    pub fn has_auth_token(&self) -> bool {
        self.inner.config.snapshot().auth_token.is_some()
    }

    /// Post endpoints.
    pub fn posts(&self) -> PostService {
        PostService::new(self.clone())
    }

    /// Folder and sharing endpoints.
    pub fn folders(&self) -> FolderService {
        FolderService::new(self.clone())
    }

    /// Health endpoint.
    pub fn health(&self) -> HealthService {
        HealthService::new(self.clone())
    }

    /// Makes a typed HTTP request.
    ///
    /// This is the single path every request takes: it composes the URL,
    /// attaches headers, encodes `body`, performs one round trip, then either
    /// decodes the 2xx body into `Res` or maps the failure to an [`Error`].
    ///
    /// # Type Parameters
    ///
    /// * `Req` - The request body type (must implement `Serialize`)
    /// * `Res` - The response body type; use [`NoContent`](crate::NoContent)
    ///   for endpoints without a body
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use poste_client::{dto::{Paged, FolderDto}, metadata::RequestMetadata, Client};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), poste_client::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://api.example.com")?
    ///     .build()?;
    ///
    /// let metadata = RequestMetadata::new(Method::GET, "/api/v1/folders")
    ///     .with_query_param("pageSize", "10");
    ///
    /// let response = client.call::<(), Paged<FolderDto>>(metadata, None).await?;
    /// println!("Got {} folders in {:?}", response.data.len(), response.latency);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned + 'static,
    {
        let config = self.inner.config.snapshot();
        let url = metadata.url(&config.base_url)?;
        let request = self.build_request(&config, &metadata, &url, body)?;

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            has_body = body.is_some(),
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %metadata.method,
                    path = %metadata.path,
                    "Request failed"
                );
                return Err(e);
            }
        };

        self.parse_response(response, start_time.elapsed())
    }

    /// Like [`Client::call`], returning only the decoded data.
    pub async fn request<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned + 'static,
    {
        self.call(metadata, body).await.map(Response::into_data)
    }

    /// Builds the transport request from a config snapshot.
    fn build_request<Req>(
        &self,
        config: &TransportConfig,
        metadata: &RequestMetadata,
        url: &Url,
        body: Option<&Req>,
    ) -> Result<HttpRequest>
    where
        Req: Serialize,
    {
        let payload = match body {
            Some(body) => Some(encode_body(body)?),
            None => None,
        };
        let has_payload = payload.is_some();

        let mut request = http::Request::new(payload.unwrap_or_default());
        *request.method_mut() = metadata.method.clone();
        *request.uri_mut() = url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;

        let headers = request.headers_mut();
        for (name, value) in &self.inner.default_headers {
            headers.insert(name, value.clone());
        }

        for (name, value) in &metadata.headers {
            headers.insert(name, value.clone());
        }

        // Caller headers never replace these.
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::try_from(format!("Bearer {}", token)).map_err(|_| {
                Error::Configuration("Auth token is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if has_payload {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }

        Ok(request)
    }

    /// Turns a transport response into a typed `Response` or an `Error`.
    fn parse_response<Res>(&self, response: HttpResponse, latency: Duration) -> Result<Response<Res>>
    where
        Res: DeserializeOwned + 'static,
    {
        let (parts, body) = response.into_parts();
        let status = parts.status;

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        if !status.is_success() {
            let error = Error::from_status(status, &body);

            if status.is_server_error() {
                tracing::warn!(status = status.as_u16(), error = %error, "Server error (5xx)");
            } else {
                tracing::error!(status = status.as_u16(), error = %error, "Request rejected");
            }

            return Err(error);
        }

        let raw_body = String::from_utf8_lossy(&body).into_owned();

        match decode_body::<Res>(&body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, parts.headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );
                Err(e)
            }
        }
    }

    /// Makes a GET request to the specified path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use poste_client::{dto::PostDto, Client};
    ///
    /// # async fn example() -> Result<(), poste_client::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://api.example.com")?
    ///     .build()?;
    ///
    /// let post = client.get::<PostDto>("/api/v1/posts/p-1").await?;
    /// println!("Post: {}", post.data.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned + 'static,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.call::<(), Res>(metadata, None).await
    }

    /// Makes a POST request to the specified path with a JSON body.
    pub async fn post<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned + 'static,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a PUT request to the specified path with a JSON body.
    pub async fn put<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned + 'static,
    {
        let metadata = RequestMetadata::new(Method::PUT, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a PATCH request to the specified path with a JSON body.
    pub async fn patch<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned + 'static,
    {
        let metadata = RequestMetadata::new(Method::PATCH, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a DELETE request to the specified path.
    pub async fn delete<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned + 'static,
    {
        let metadata = RequestMetadata::new(Method::DELETE, path);
        self.call::<(), Res>(metadata, None).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("has_auth_token", &self.has_auth_token())
            .finish_non_exhaustive()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use poste_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), poste_client::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com")?
///     .auth_token("token-123")
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "poste-cli/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    auth_token: Option<String>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            default_headers: HeaderMap::new(),
            timeout: None,
            transport: None,
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// Defaults to [`DEFAULT_BASE_URL`] when never called.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Sets the initial bearer token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request timeout of the default transport.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the default reqwest transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default transport cannot be created.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => {
                if self.timeout.is_some() {
                    tracing::warn!("Timeout is ignored when a custom transport is set");
                }
                transport
            }
            None => Arc::new(ReqwestTransport::with_timeout(self.timeout)?),
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                config: SharedConfig::new(TransportConfig {
                    base_url,
                    auth_token: self.auth_token,
                }),
                default_headers: self.default_headers,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
