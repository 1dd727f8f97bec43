//! The task resolution loop.
//!
//! Polls the status endpoint on an adaptive schedule until the task reaches
//! a terminal state, then fetches the full record once. Three failure
//! policies coexist here and are kept as separate branches:
//!
//! - a **one-shot credential rotation**: if the public polling token is
//!   rejected, the loop retries immediately (no sleep) with the primary
//!   credential, exactly once;
//! - a **bounded transient-failure budget**: network errors and 5xx
//!   responses are retried on the normal schedule up to
//!   [`MAX_CONSECUTIVE_FAILURES`], with the counter reset by any successful
//!   check;
//! - a **global timeout**: the whole resolution, sleeps included, must fit
//!   inside [`POLL_TIMEOUT`].
//!
//! Interval computation is a pure function of elapsed time and a drawn
//! jitter ([`poll_interval`]) so the schedule is testable without timers;
//! the loop itself is tested under Tokio's paused clock.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use aperture_core::{TaskRecord, TaskStatus};

use crate::api::{StatusProbe, TaskApi};
use crate::error::{ApiError, ResolveError};

// ---------------------------------------------------------------------------
// Scheduling constants
// ---------------------------------------------------------------------------

/// Overall budget for one resolution, measured from the first iteration.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Elapsed time below which the fast polling interval applies.
pub const FAST_PHASE: Duration = Duration::from_secs(12);

/// Base poll interval during the fast phase.
pub const FAST_INTERVAL: Duration = Duration::from_millis(2500);

/// Base poll interval after the fast phase.
pub const SLOW_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound of the uniform random jitter added to every interval.
pub const MAX_JITTER: Duration = Duration::from_millis(500);

/// Consecutive retryable status-check failures tolerated before giving up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 7;

// ---------------------------------------------------------------------------
// Interval computation
// ---------------------------------------------------------------------------

/// Compute the sleep before the next status check.
///
/// Pure: depends only on the elapsed time (fast vs. slow phase), the drawn
/// jitter, and the time remaining in the budget. The result never extends
/// past the deadline, so the loop wakes exactly at the deadline for its
/// final timeout check.
pub fn poll_interval(elapsed: Duration, jitter: Duration, remaining: Duration) -> Duration {
    let base = if elapsed < FAST_PHASE {
        FAST_INTERVAL
    } else {
        SLOW_INTERVAL
    };
    (base + jitter).min(remaining)
}

/// Draw the per-iteration jitter, uniform in `0..=MAX_JITTER`.
///
/// Spreads the wakeups of many concurrent handles so they do not hit the
/// status endpoint in lockstep.
fn draw_jitter() -> Duration {
    Duration::from_millis(rand::rng().random_range(0..=MAX_JITTER.as_millis() as u64))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// One-shot classification of a single status-check attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusOutcome {
    /// Task reached `completed`; the full record can be fetched.
    Completed,
    /// Task reached `failed`; the job itself concluded unsuccessfully.
    Failed,
    /// Task is still in flight (or reported a status this SDK does not know).
    Pending,
    /// The credential in use was rejected, or the task is invisible to it.
    /// 404 is folded in here: a missing task is indistinguishable from a
    /// denied one.
    Unauthorized,
    /// Transient infrastructure failure, eligible for a scheduled retry.
    Retryable { detail: String },
    /// Non-success response outside the known classes (e.g. a 400). Fatal.
    Unexpected { status: u16 },
}

/// Classify one status-check result.
fn classify(result: Result<StatusProbe, ApiError>) -> StatusOutcome {
    match result {
        Err(err) => StatusOutcome::Retryable {
            detail: err.to_string(),
        },
        Ok(probe) if probe.ok => match probe.status {
            Some(TaskStatus::Completed) => StatusOutcome::Completed,
            Some(TaskStatus::Failed) => StatusOutcome::Failed,
            _ => StatusOutcome::Pending,
        },
        Ok(probe) => match probe.http_status {
            401 | 403 | 404 => StatusOutcome::Unauthorized,
            status if status >= 500 => StatusOutcome::Retryable {
                detail: format!("status endpoint returned HTTP {status}"),
            },
            status => StatusOutcome::Unexpected { status },
        },
    }
}

// ---------------------------------------------------------------------------
// Resolution loop
// ---------------------------------------------------------------------------

/// Poll until the task reaches a terminal state, then fetch the full record.
///
/// One invocation per [`TaskHandle`](crate::TaskHandle): the handle's
/// memoization guarantees this is never entered twice for the same task.
pub(crate) async fn poll_until_complete(
    api: &dyn TaskApi,
    task_id: &str,
    poll_token: Option<&str>,
) -> Result<TaskRecord, ResolveError> {
    let started = Instant::now();
    let deadline = started + POLL_TIMEOUT;
    let mut consecutive_failures: u32 = 0;
    // With no public token the primary credential is the only path, so the
    // fallback counts as already engaged.
    let mut fallback_engaged = poll_token.is_none();

    loop {
        if Instant::now() >= deadline {
            tracing::warn!(task_id, "Task resolution timed out");
            return Err(ResolveError::Timeout {
                task_id: task_id.to_string(),
                budget_secs: POLL_TIMEOUT.as_secs(),
            });
        }

        let token = if fallback_engaged { None } else { poll_token };
        match classify(api.check_status(task_id, token).await) {
            StatusOutcome::Pending => {
                consecutive_failures = 0;
                tracing::debug!(task_id, "Task still pending");
            }
            StatusOutcome::Completed => {
                tracing::debug!(task_id, "Task completed, fetching record");
                return fetch_completed(api, task_id).await;
            }
            StatusOutcome::Failed => {
                tracing::warn!(task_id, "Task failed on the server");
                return Err(ResolveError::TaskFailed {
                    task_id: task_id.to_string(),
                });
            }
            StatusOutcome::Unauthorized => {
                if !fallback_engaged {
                    // One-shot rotation: drop the public token and retry
                    // immediately with the primary credential, no sleep.
                    tracing::debug!(
                        task_id,
                        "Public token rejected, retrying with primary credential"
                    );
                    fallback_engaged = true;
                    continue;
                }
                return Err(ResolveError::Unauthorized {
                    task_id: task_id.to_string(),
                });
            }
            StatusOutcome::Retryable { detail } => {
                consecutive_failures += 1;
                tracing::warn!(
                    task_id,
                    attempt = consecutive_failures,
                    error = %detail,
                    "Transient status check failure"
                );
                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err(ResolveError::FetchError {
                        task_id: task_id.to_string(),
                        attempts: consecutive_failures,
                        last_error: detail,
                    });
                }
            }
            StatusOutcome::Unexpected { status } => {
                tracing::warn!(task_id, status, "Unexpected status check response");
                return Err(ResolveError::UnexpectedStatus {
                    task_id: task_id.to_string(),
                    status,
                });
            }
        }

        let now = Instant::now();
        let sleep = poll_interval(
            now.duration_since(started),
            draw_jitter(),
            deadline.saturating_duration_since(now),
        );
        tokio::time::sleep(sleep).await;
    }
}

/// Fetch the full record for a task known to have completed.
///
/// Any failure here is fatal: the job is done server-side, and this
/// resolution will not try again.
async fn fetch_completed(api: &dyn TaskApi, task_id: &str) -> Result<TaskRecord, ResolveError> {
    let fetch = match api.fetch_task(task_id).await {
        Ok(fetch) => fetch,
        Err(err) => {
            return Err(ResolveError::TaskFetchError {
                task_id: task_id.to_string(),
                status: None,
                detail: err.to_string(),
            });
        }
    };

    if !fetch.ok {
        return Err(match fetch.http_status {
            401 | 403 | 404 => ResolveError::Unauthorized {
                task_id: task_id.to_string(),
            },
            status => ResolveError::TaskFetchError {
                task_id: task_id.to_string(),
                status: Some(status),
                detail: format!("HTTP {status}"),
            },
        });
    }

    match fetch.record {
        Some(record) => Ok(record),
        None => Err(ResolveError::TaskFetchError {
            task_id: task_id.to_string(),
            status: Some(fetch.http_status),
            detail: "response contained no task record".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
