//! Task handles with memoized, single-flight resolution.

use std::sync::Arc;

use tokio::sync::OnceCell;

use aperture_core::TaskRecord;

use crate::api::TaskApi;
use crate::error::ResolveError;
use crate::poller;

/// Handle to one in-flight generation task.
///
/// The handle owns the task id, the optional public polling token issued at
/// submit time, and the memoized resolution outcome. Polling starts only
/// when [`resolve`](Self::resolve) is first called; every later call,
/// including concurrent ones, observes the same in-flight or completed
/// outcome instead of polling again.
pub struct TaskHandle {
    task_id: String,
    poll_token: Option<String>,
    api: Arc<dyn TaskApi>,
    outcome: OnceCell<Result<TaskRecord, ResolveError>>,
}

impl TaskHandle {
    pub(crate) fn new(api: Arc<dyn TaskApi>, task_id: String, poll_token: Option<String>) -> Self {
        Self {
            task_id,
            poll_token,
            api,
            outcome: OnceCell::new(),
        }
    }

    /// Opaque server-assigned task identifier.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Scoped public polling token, when one was issued for this task.
    pub fn poll_token(&self) -> Option<&str> {
        self.poll_token.as_deref()
    }

    /// Resolve the task to its completed record.
    ///
    /// The first call starts the polling loop. Concurrent callers join that
    /// one attempt, and callers arriving after it finished get a clone of
    /// the stored outcome without any network traffic.
    pub async fn resolve(&self) -> Result<TaskRecord, ResolveError> {
        self.outcome
            .get_or_init(|| {
                poller::poll_until_complete(
                    self.api.as_ref(),
                    &self.task_id,
                    self.poll_token.as_deref(),
                )
            })
            .await
            .clone()
    }
}
