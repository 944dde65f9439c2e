use crate::{dto::HealthResponse, metadata::RequestMetadata, Client, Result};
use http::Method;

/// Path probed by [`HealthService::health`] unless overridden.
pub const DEFAULT_HEALTH_PATH: &str = "/client/health";

/// Service liveness probe.
#[derive(Debug, Clone)]
pub struct HealthService {
    client: Client,
    path: String,
}

impl HealthService {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            path: DEFAULT_HEALTH_PATH.to_string(),
        }
    }

    /// Probes `path` instead, e.g. `/api/health` on deployments that mount
    /// the check under the API prefix.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let metadata = RequestMetadata::new(Method::GET, self.path.as_str());
        self.client.request::<(), _>(metadata, None).await
    }
}
