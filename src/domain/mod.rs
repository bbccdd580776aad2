//! Value types serialized at the service boundary.
//!
//! The HTTP transport itself lives outside this crate; these types define
//! the shape of what it sends. Field names match the wire contract, so a
//! transport layer can serialize them directly.

use serde::{Deserialize, Serialize};

use crate::core::ExtractError;

/// Source image metadata, reported only when the caller asks for it.
///
/// Width and height always describe the original input, never the resized
/// model tensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Original image width in pixels.
    #[serde(rename = "image_width")]
    pub width: u32,
    /// Original image height in pixels.
    #[serde(rename = "image_height")]
    pub height: u32,
    /// Detected source format, or `"UNKNOWN"`.
    #[serde(rename = "image_format")]
    pub format: String,
}

/// The complete result of one successful extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Caller-supplied opaque identifier, passed through unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// L2-normalized feature vector.
    pub features: Vec<f32>,
    /// Length of `features`.
    pub feature_dimension: usize,
    /// Name of the model that produced the features.
    pub model_name: String,
    /// Version of the model that produced the features.
    pub model_version: String,
    /// Wall-clock processing time in milliseconds, rounded to two decimals.
    pub processing_time_ms: f64,
    /// Source image metadata, present only when requested.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExtractionMetadata>,
}

/// Readiness report for the service.
///
/// The service itself is always `"healthy"` once the process is up;
/// `model_loaded` reflects whether the pipeline reached its `Ready` state.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall service status.
    pub status: String,
    /// Service name from configuration.
    pub service: String,
    /// Service version from configuration.
    pub version: String,
    /// Whether the model loaded successfully.
    pub model_loaded: bool,
}

/// Error body sent to callers, paired with the error's status code.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message. For internal faults this is a fixed generic
    /// message; diagnostic detail never leaves the process.
    pub error: String,
}

impl From<&ExtractError> for ErrorResponse {
    fn from(err: &ExtractError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
