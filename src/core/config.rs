//! Pipeline configuration.
//!
//! Configuration is built once at startup, validated with
//! [`ExtractorConfig::validate`], and injected into each component. It is
//! immutable afterwards; nothing in the pipeline mutates settings at
//! request time.

use crate::core::ExtractError;
use crate::core::validation::{validate_finite, validate_non_empty, validate_positive};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default maximum payload size: 10 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default model input spatial size (height, width).
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (224, 224);

/// Default feature vector dimension.
pub const DEFAULT_FEATURE_DIMENSION: usize = 2048;

/// ImageNet per-channel normalization mean.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel normalization standard deviation.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Configuration for the loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name reported in every successful result.
    pub model_name: String,
    /// Model version reported in every successful result.
    pub model_version: String,
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Expected length of the raw feature output.
    pub feature_dimension: usize,
    /// Model input spatial size as (height, width). All images are resized
    /// to this size regardless of original dimensions.
    pub input_size: (u32, u32),
    /// Per-channel normalization mean.
    pub normalization_mean: [f32; 3],
    /// Per-channel normalization standard deviation.
    pub normalization_std: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: "resnet50".to_string(),
            model_version: "v2.7".to_string(),
            model_path: PathBuf::from("models/resnet50-v2-7.onnx"),
            feature_dimension: DEFAULT_FEATURE_DIMENSION,
            input_size: DEFAULT_INPUT_SIZE,
            normalization_mean: IMAGENET_MEAN,
            normalization_std: IMAGENET_STD,
        }
    }
}

impl ModelConfig {
    /// Validates model settings before anything is loaded.
    pub fn validate(&self) -> Result<(), ExtractError> {
        validate_positive(self.feature_dimension, "feature_dimension")?;
        validate_positive(self.input_size.0, "input_size.height")?;
        validate_positive(self.input_size.1, "input_size.width")?;

        for (i, &m) in self.normalization_mean.iter().enumerate() {
            validate_finite(m, &format!("normalization_mean[{i}]"))?;
        }
        for (i, &s) in self.normalization_std.iter().enumerate() {
            validate_finite(s, &format!("normalization_std[{i}]"))?;
            validate_positive(s, &format!("normalization_std[{i}]"))?;
        }
        Ok(())
    }
}

/// Top-level configuration for the extraction service core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Service name reported by the health status.
    pub service_name: String,
    /// Service version reported by the health status.
    pub service_version: String,
    /// Model identity and preprocessing parameters.
    pub model: ModelConfig,
    /// Maximum accepted payload size in bytes.
    pub max_payload_bytes: usize,
    /// Content types accepted by the request validator.
    pub allowed_content_types: Vec<String>,
    /// Optional intra-op thread count for the ONNX session.
    pub intra_threads: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            service_name: "feature-extraction-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            model: ModelConfig::default(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            intra_threads: None,
        }
    }
}

impl ExtractorConfig {
    /// Validates the whole configuration. Called once at startup; invalid
    /// values fail fast here instead of per-request.
    pub fn validate(&self) -> Result<(), ExtractError> {
        self.model.validate()?;
        validate_positive(self.max_payload_bytes, "max_payload_bytes")?;
        validate_non_empty(&self.allowed_content_types, "allowed_content_types")?;
        if let Some(threads) = self.intra_threads {
            validate_positive(threads, "intra_threads")?;
        }
        Ok(())
    }
}
