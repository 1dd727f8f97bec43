//! Rust client for the Aperture asynchronous image-generation API.
//!
//! Submitting a request returns a [`TaskHandle`] for a server-side task;
//! resolving the handle polls the status endpoint on an adaptive schedule
//! until the task completes, then fetches the full [`TaskRecord`]:
//!
//! - [`ApertureClient`] — configuration, submit, and re-attach entry points.
//! - [`TaskHandle`] — one in-flight task; resolution is memoized and
//!   single-flight.
//! - [`poller`] — the resolution loop: adaptive intervals with jitter,
//!   public-token → primary-key credential fallback, a bounded
//!   transient-failure budget, and a global timeout.
//! - [`api`] — the [`TaskApi`](api::TaskApi) capability seam over the
//!   status and fetch endpoints.
//!
//! Request validation, the model catalog, task record accessors, and
//! webhook signature verification live in [`aperture_core`] and are
//! re-exported here where they are part of the everyday surface.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod handle;
pub mod poller;

pub use aperture_core::{GenerationRequest, ImageOutput, TaskRecord, TaskStatus};
pub use client::ApertureClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, Error, ResolveError, Result};
pub use handle::TaskHandle;
