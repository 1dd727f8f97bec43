//! Generation request types and validation.
//!
//! [`GenerationRequest`] is the JSON body of the submit endpoint. Validation
//! is performed client-side via [`validate_request`] so malformed requests
//! never cost a network round-trip.

use serde::{Deserialize, Serialize};

use crate::catalog::{validate_model, ModelLimits};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Request limits
// ---------------------------------------------------------------------------

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Smallest accepted width or height in pixels.
pub const MIN_DIMENSION: u32 = 256;

/// Width and height must be a multiple of this step.
pub const DIMENSION_STEP: u32 = 8;

/// Default output dimension when the caller does not specify one.
pub const DEFAULT_DIMENSION: u32 = 1024;

/// Default number of images per request.
pub const DEFAULT_NUM_IMAGES: u8 = 1;

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// Body of the submit endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Catalog model identifier (see [`crate::catalog`]).
    pub model: String,
    /// Text prompt describing the desired image.
    pub prompt: String,
    /// Concepts to steer away from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of images to generate.
    pub num_images: u8,
    /// Seed for reproducible sampling. Omitted means server-chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Create a request with catalog defaults for everything but the model
    /// and prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            negative_prompt: None,
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            num_images: DEFAULT_NUM_IMAGES,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a request against the model's catalog limits.
///
/// Checks, in order: model id is known, prompt is non-empty and within
/// [`MAX_PROMPT_CHARS`], both dimensions are within bounds and aligned to
/// [`DIMENSION_STEP`], and the image count fits the model.
pub fn validate_request(request: &GenerationRequest) -> Result<(), CoreError> {
    let limits = validate_model(&request.model)?;

    if request.prompt.trim().is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".into()));
    }
    if request.prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds {MAX_PROMPT_CHARS} characters"
        )));
    }

    validate_dimension(request.width, "width", &limits)?;
    validate_dimension(request.height, "height", &limits)?;

    if request.num_images == 0 {
        return Err(CoreError::Validation(
            "num_images must be at least 1".into(),
        ));
    }
    if request.num_images > limits.max_images {
        return Err(CoreError::Validation(format!(
            "Model '{}' generates at most {} images per request",
            request.model, limits.max_images
        )));
    }

    Ok(())
}

/// Validate a single output dimension against the model limits.
fn validate_dimension(value: u32, field: &str, limits: &ModelLimits) -> Result<(), CoreError> {
    if value < MIN_DIMENSION || value > limits.max_dimension {
        return Err(CoreError::Validation(format!(
            "{field} must be between {MIN_DIMENSION} and {} pixels",
            limits.max_dimension
        )));
    }
    if value % DIMENSION_STEP != 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a multiple of {DIMENSION_STEP}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MODEL_APERTURE_FLASH, MODEL_APERTURE_ONE, MODEL_APERTURE_ULTRA};

    fn request() -> GenerationRequest {
        GenerationRequest::new(MODEL_APERTURE_ONE, "a lighthouse at dusk")
    }

    // -- defaults --

    #[test]
    fn new_request_uses_catalog_defaults() {
        let req = request();
        assert_eq!(req.width, DEFAULT_DIMENSION);
        assert_eq!(req.height, DEFAULT_DIMENSION);
        assert_eq!(req.num_images, DEFAULT_NUM_IMAGES);
        assert!(req.seed.is_none());
        assert!(req.negative_prompt.is_none());
    }

    #[test]
    fn default_request_is_valid() {
        assert!(validate_request(&request()).is_ok());
    }

    // -- model --

    #[test]
    fn unknown_model_is_rejected() {
        let mut req = request();
        req.model = "aperture-nine".into();
        assert!(validate_request(&req).is_err());
    }

    // -- prompt --

    #[test]
    fn empty_prompt_is_rejected() {
        let mut req = request();
        req.prompt = "   ".into();
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("Prompt"));
    }

    #[test]
    fn overlong_prompt_is_rejected() {
        let mut req = request();
        req.prompt = "x".repeat(MAX_PROMPT_CHARS + 1);
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn prompt_at_limit_is_accepted() {
        let mut req = request();
        req.prompt = "x".repeat(MAX_PROMPT_CHARS);
        assert!(validate_request(&req).is_ok());
    }

    // -- dimensions --

    #[test]
    fn dimension_below_minimum_is_rejected() {
        let mut req = request();
        req.width = MIN_DIMENSION - DIMENSION_STEP;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn dimension_above_model_cap_is_rejected() {
        let mut req = request();
        req.model = MODEL_APERTURE_FLASH.into();
        req.height = 1536; // flash caps at 1024
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn same_dimension_is_fine_on_larger_model() {
        let mut req = request();
        req.height = 1536;
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn misaligned_dimension_is_rejected() {
        let mut req = request();
        req.width = 1000 + 4; // not a multiple of 8
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("multiple"));
    }

    // -- image count --

    #[test]
    fn zero_images_is_rejected() {
        let mut req = request();
        req.num_images = 0;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn image_count_above_model_cap_is_rejected() {
        let mut req = request();
        req.model = MODEL_APERTURE_ULTRA.into();
        req.num_images = 2; // ultra is single-image
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn image_count_at_cap_is_accepted() {
        let mut req = request();
        req.num_images = 4;
        assert!(validate_request(&req).is_ok());
    }

    // -- serialization --

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_value(request()).unwrap();
        assert!(json.get("seed").is_none());
        assert!(json.get("negative_prompt").is_none());
        assert_eq!(json["model"], MODEL_APERTURE_ONE);
    }

    #[test]
    fn seed_round_trips() {
        let mut req = request();
        req.seed = Some(42);
        let json = serde_json::to_string(&req).unwrap();
        let back: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, Some(42));
    }
}
