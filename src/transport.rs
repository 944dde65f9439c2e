//! The HTTP round-trip behind every request.
//!
//! [`Client`](crate::Client) builds a plain `http::Request` and hands it to a
//! [`Transport`]. The default [`ReqwestTransport`] performs real network I/O;
//! tests and embedders can inject their own implementation.

use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// A request as handed to a [`Transport`].
pub type HttpRequest = http::Request<Vec<u8>>;

/// A fully buffered response returned by a [`Transport`].
pub type HttpResponse = http::Response<Vec<u8>>;

/// Performs one HTTP exchange.
///
/// Implementations return every response that carries a status line as
/// `Ok`, including 4xx and 5xx; status interpretation belongs to the client.
/// Failures that never reach a status line (DNS, TLS, timeouts, resets) are
/// reported as [`Error::Transport`]. Implementations must not retry.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use poste_client::transport::{HttpRequest, HttpResponse, Transport};
///
/// struct AlwaysOk;
///
/// #[async_trait]
/// impl Transport for AlwaysOk {
///     async fn send(&self, _request: HttpRequest) -> poste_client::Result<HttpResponse> {
///         Ok(http::Response::new(br#"{"status":"ok"}"#.to_vec()))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Creates a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { http_client })
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = reqwest::Request::try_from(request)?;
        let response = self.http_client.execute(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        let mut buffered = http::Response::new(body);
        *buffered.status_mut() = status;
        *buffered.headers_mut() = headers;
        Ok(buffered)
    }
}
