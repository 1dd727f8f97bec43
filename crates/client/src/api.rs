//! Transport seam for the task endpoints.
//!
//! [`TaskApi`] is the minimal capability surface the resolution loop
//! consumes: one status check, one full fetch. Non-2xx responses are data
//! (`ok = false` plus the status code), not raised errors; only
//! transport-level failures raise. [`HttpTaskApi`] is the production
//! implementation over [`reqwest`]; tests substitute scripted fakes.

use async_trait::async_trait;
use serde::Deserialize;

use aperture_core::{GenerationRequest, TaskRecord, TaskStatus};

use crate::error::ApiError;

/// Header carrying the scoped public polling token.
pub const TASK_TOKEN_HEADER: &str = "X-Task-Token";

// ---------------------------------------------------------------------------
// Capability DTOs
// ---------------------------------------------------------------------------

/// Result of a single status check.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    /// Whether the response had a success status code.
    pub ok: bool,
    /// The HTTP status code of the response.
    pub http_status: u16,
    /// Coarse lifecycle status; present only when `ok`.
    pub status: Option<TaskStatus>,
}

/// Result of a full-record fetch.
#[derive(Debug, Clone)]
pub struct TaskFetch {
    /// Whether the response had a success status code.
    pub ok: bool,
    /// The HTTP status code of the response.
    pub http_status: u16,
    /// The parsed record; present only when `ok`.
    pub record: Option<TaskRecord>,
}

/// The two capabilities the resolution loop depends on.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Check the lifecycle status of a task.
    ///
    /// When `poll_token` is given, it replaces the primary credential for
    /// this one request; otherwise the transport's primary API key applies.
    async fn check_status(
        &self,
        task_id: &str,
        poll_token: Option<&str>,
    ) -> Result<StatusProbe, ApiError>;

    /// Fetch the complete record of a task. Always uses the primary
    /// credential.
    async fn fetch_task(&self, task_id: &str) -> Result<TaskFetch, ApiError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response returned by the submit endpoint after queuing a task.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned opaque task identifier.
    pub id: String,
    /// Scoped token for polling this task's status without the primary key,
    /// when the account has them enabled.
    #[serde(default)]
    pub poll_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: TaskStatus,
}

// ---------------------------------------------------------------------------
// HttpTaskApi
// ---------------------------------------------------------------------------

/// Production [`TaskApi`] over the Aperture HTTP API.
pub(crate) struct HttpTaskApi {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTaskApi {
    pub(crate) fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Submit a generation request.
    ///
    /// Sends a `POST /v1/tasks` request. Unlike the polling capabilities, a
    /// non-2xx response here is an error: there is no task to keep resolving.
    pub(crate) async fn submit(
        &self,
        request: &GenerationRequest,
    ) -> Result<SubmitResponse, ApiError> {
        let response = self
            .http
            .post(format!("{}/v1/tasks", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn check_status(
        &self,
        task_id: &str,
        poll_token: Option<&str>,
    ) -> Result<StatusProbe, ApiError> {
        let url = format!("{}/v1/tasks/{}/status", self.base_url, task_id);
        let request = match poll_token {
            Some(token) => self.http.get(&url).header(TASK_TOKEN_HEADER, token),
            None => self.http.get(&url).bearer_auth(&self.api_key),
        };

        let response = request.send().await?;
        let http_status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(StatusProbe {
                ok: false,
                http_status,
                status: None,
            });
        }

        let body: StatusResponse = response.json().await?;
        Ok(StatusProbe {
            ok: true,
            http_status,
            status: Some(body.status),
        })
    }

    async fn fetch_task(&self, task_id: &str) -> Result<TaskFetch, ApiError> {
        let response = self
            .http
            .get(format!("{}/v1/tasks/{}", self.base_url, task_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let http_status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(TaskFetch {
                ok: false,
                http_status,
                record: None,
            });
        }

        let record: TaskRecord = response.json().await?;
        Ok(TaskFetch {
            ok: true,
            http_status,
            record: Some(record),
        })
    }
}
