//! Error types for the Aperture client.
//!
//! Each layer has its own error enum; [`Error`] is the transparent umbrella
//! returned by the convenience entry points on
//! [`ApertureClient`](crate::ApertureClient).

use aperture_core::CoreError;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the HTTP transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code where one is an error.
    #[error("Aperture API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Classified failure of one task resolution.
///
/// `Clone` and `PartialEq` so the memoized resolution outcome on a
/// [`TaskHandle`](crate::TaskHandle) can be handed to every caller and
/// compared in tests. Underlying transport causes are carried as rendered
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The overall timeout budget elapsed before a terminal status.
    #[error("Task {task_id} did not complete within {budget_secs}s")]
    Timeout { task_id: String, budget_secs: u64 },

    /// Every available credential was rejected, or the task is invisible.
    #[error("Not authorized to poll task {task_id}")]
    Unauthorized { task_id: String },

    /// Status polling exhausted the consecutive-failure budget.
    #[error("Status check for task {task_id} failed {attempts} consecutive times: {last_error}")]
    FetchError {
        task_id: String,
        attempts: u32,
        /// Rendered form of the most recent transient failure.
        last_error: String,
    },

    /// The status endpoint answered outside the known response classes
    /// (not success, not auth, not 5xx; e.g. a 400).
    #[error("Status check for task {task_id} returned unexpected HTTP {status}")]
    UnexpectedStatus { task_id: String, status: u16 },

    /// The task completed but the final record fetch failed.
    #[error("Task {task_id} completed but the result fetch failed: {detail}")]
    TaskFetchError {
        task_id: String,
        /// HTTP status of the failed fetch; `None` for transport failures.
        status: Option<u16>,
        detail: String,
    },

    /// The job itself concluded unsuccessfully server-side.
    #[error("Task {task_id} failed on the server")]
    TaskFailed { task_id: String },
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors while assembling a [`ClientConfig`](crate::ClientConfig) from the
/// environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but unparseable.
    #[error("Invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

// ---------------------------------------------------------------------------
// Umbrella
// ---------------------------------------------------------------------------

/// Any error the client can surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client-side request validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration could not be assembled.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transport-level call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Task resolution concluded with a classified failure.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Convenience alias for client entry points.
pub type Result<T> = std::result::Result<T, Error>;
