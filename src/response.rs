//! Response wrapper that keeps HTTP details next to the decoded data.
//!
//! Services return just the data; [`Client::call`](crate::Client::call)
//! returns the full [`Response`] for callers that need status, headers or
//! timing.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful (2xx) response.
///
/// # Examples
///
/// ```no_run
/// use poste_client::{dto::HealthResponse, Client};
///
/// # async fn example() -> Result<(), poste_client::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .build()?;
///
/// let response = client.get::<HealthResponse>("/client/health").await?;
/// if let Some(server) = response.headers.get("server") {
///     println!("{:?} answered {} in {:?}", server, response.status, response.latency);
/// }
/// let health = response.into_data();
/// println!("Health: {}", health.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The raw response body, lossily decoded as UTF-8.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Consumes the response, returning only the data.
    pub fn into_data(self) -> T {
        self.data
    }
}

