//! The Aperture API client.

use std::sync::Arc;
use std::time::Duration;

use aperture_core::request::validate_request;
use aperture_core::{GenerationRequest, TaskRecord};

use crate::api::{HttpTaskApi, SubmitResponse};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::handle::TaskHandle;

/// Client for the Aperture asynchronous image-generation API.
///
/// # Example
///
/// ```no_run
/// use aperture_client::{ApertureClient, GenerationRequest};
///
/// # async fn example() -> aperture_client::Result<()> {
/// let client = ApertureClient::from_env()?;
/// let request = GenerationRequest::new("aperture-one", "a lighthouse at dusk");
/// let record = client.generate(&request).await?;
/// println!("{:?}", record.first_image_url());
/// # Ok(())
/// # }
/// ```
pub struct ApertureClient {
    api: Arc<HttpTaskApi>,
}

impl ApertureClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_http_client(http, config)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful for
    /// connection pooling across clients).
    pub fn with_http_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            api: Arc::new(HttpTaskApi::new(http, config.base_url, config.api_key)),
        }
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Submit a generation request, returning a handle to the queued task.
    ///
    /// The request is validated against the model catalog before any
    /// network call.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle> {
        validate_request(request)?;
        let SubmitResponse { id, poll_token } = self.api.submit(request).await?;
        tracing::debug!(task_id = %id, model = %request.model, "Task submitted");
        Ok(TaskHandle::new(self.api.clone(), id, poll_token))
    }

    /// Re-attach to an already-submitted task by id.
    ///
    /// Status checks will use the primary credential.
    pub fn task(&self, task_id: impl Into<String>) -> TaskHandle {
        TaskHandle::new(self.api.clone(), task_id.into(), None)
    }

    /// Re-attach to a task together with its scoped public polling token.
    pub fn task_with_token(
        &self,
        task_id: impl Into<String>,
        poll_token: impl Into<String>,
    ) -> TaskHandle {
        TaskHandle::new(self.api.clone(), task_id.into(), Some(poll_token.into()))
    }

    /// Submit a request and resolve it to the completed record.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<TaskRecord> {
        let handle = self.submit(request).await?;
        Ok(handle.resolve().await?)
    }
}
