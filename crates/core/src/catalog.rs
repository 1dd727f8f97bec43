//! Model catalog constants and per-model generation limits.
//!
//! Mirrors the server-side catalog so that requests can be rejected before
//! any network round-trip. The limits here track the published API
//! documentation; the server remains the authority.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Model identifiers
// ---------------------------------------------------------------------------

/// Latency-optimized text-to-image model.
pub const MODEL_APERTURE_FLASH: &str = "aperture-flash-1";

/// Default quality-focused text-to-image model.
pub const MODEL_APERTURE_ONE: &str = "aperture-one";

/// High-resolution model with relaxed dimension caps and single-image output.
pub const MODEL_APERTURE_ULTRA: &str = "aperture-ultra";

/// All model identifiers accepted by the submit endpoint.
pub const SUPPORTED_MODELS: &[&str] = &[
    MODEL_APERTURE_FLASH,
    MODEL_APERTURE_ONE,
    MODEL_APERTURE_ULTRA,
];

// ---------------------------------------------------------------------------
// Per-model limits
// ---------------------------------------------------------------------------

/// Generation limits for one catalog model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelLimits {
    /// Largest accepted width or height in pixels.
    pub max_dimension: u32,
    /// Largest accepted image count per request.
    pub max_images: u8,
}

/// Look up the limits for a model identifier.
///
/// Returns `None` for identifiers not in the catalog.
pub fn limits_for(model: &str) -> Option<ModelLimits> {
    match model {
        MODEL_APERTURE_FLASH => Some(ModelLimits {
            max_dimension: 1024,
            max_images: 4,
        }),
        MODEL_APERTURE_ONE => Some(ModelLimits {
            max_dimension: 1536,
            max_images: 4,
        }),
        MODEL_APERTURE_ULTRA => Some(ModelLimits {
            max_dimension: 2048,
            max_images: 1,
        }),
        _ => None,
    }
}

/// Validate that a model identifier is in the catalog, returning its limits.
pub fn validate_model(model: &str) -> Result<ModelLimits, CoreError> {
    limits_for(model).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unknown model '{model}'. Must be one of: {}",
            SUPPORTED_MODELS.join(", ")
        ))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
