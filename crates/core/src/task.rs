//! Task record, lifecycle status, and typed accessors over the output
//! payload.
//!
//! The full-fetch endpoint returns a [`TaskRecord`] whose `output` field is
//! kept as raw JSON: the server adds output keys without notice, and the SDK
//! should not reject records it does not fully understand. The typed
//! accessors ([`TaskRecord::images`], [`TaskRecord::seed`], ...) pick out the
//! documented parts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Coarse lifecycle status reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Queued or generating.
    Pending,
    /// Finished successfully; the full record can be fetched.
    Completed,
    /// The job itself concluded unsuccessfully server-side.
    Failed,
    /// A status string this SDK version does not know. Non-terminal.
    Unknown,
}

impl TaskStatus {
    /// String representation as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown => "unknown",
        }
    }

    /// Parse from a wire string, mapping unrecognized values to `Unknown`.
    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => TaskStatus::Pending,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Unknown,
        }
    }

    /// Whether polling should stop at this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TaskStatus::from_str(&s))
    }
}

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

/// Complete record of one generation task, as returned by the full-fetch
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Server-assigned opaque task identifier.
    pub id: String,
    /// Lifecycle status at fetch time.
    pub status: TaskStatus,
    /// Catalog model that produced the output.
    #[serde(default)]
    pub model: Option<String>,
    /// When the task was accepted.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the task reached a terminal state.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Raw output payload. Prefer the typed accessors.
    #[serde(default)]
    pub output: serde_json::Value,
}

/// One generated image in the output payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageOutput {
    /// Download URL for the image.
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl TaskRecord {
    /// The generated images, in output order.
    ///
    /// Entries the SDK cannot parse are skipped rather than failing the
    /// whole accessor.
    pub fn images(&self) -> Vec<ImageOutput> {
        self.output
            .get("images")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// URL of the first generated image, if any.
    pub fn first_image_url(&self) -> Option<&str> {
        self.output
            .get("images")?
            .as_array()?
            .first()?
            .get("url")?
            .as_str()
    }

    /// The seed actually used by the sampler.
    pub fn seed(&self) -> Option<u64> {
        self.output.get("seed")?.as_u64()
    }

    /// Server-side inference time in seconds.
    pub fn inference_secs(&self) -> Option<f64> {
        self.output.get("timings")?.get("inference")?.as_f64()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
