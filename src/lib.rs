//! # img-embed
//!
//! Deterministic image feature extraction for similarity search: raw image
//! bytes in, a fixed-length L2-normalized `f32` feature vector out.
//!
//! The extraction pipeline runs in a fixed sequence: request validation,
//! image decoding, tensor preprocessing, a single inference call against an
//! ONNX model, and L2 normalization of the raw output. The model is loaded
//! once at startup; requests are served from the same read-only handle.
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, and the inference engine boundary
//! * [`domain`] - Result and health value types serialized at the service boundary
//! * [`processors`] - Image decoding and tensor preprocessing
//! * [`pipeline`] - The orchestrator and its readiness state machine
//!
//! ## Example
//!
//! ```no_run
//! use img_embed::prelude::*;
//!
//! let config = ExtractorConfig::default();
//! let pipeline = Pipeline::load(config)?;
//!
//! let bytes = std::fs::read("photo.jpg")?;
//! let result = pipeline.extract(&bytes, "image/jpeg", ExtractOptions::default())?;
//! assert_eq!(result.features.len(), result.feature_dimension);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error handling
    pub use crate::core::{ErrorClass, ExtractError, ExtractResult};

    // Configuration
    pub use crate::core::config::{ExtractorConfig, ModelConfig};

    // Inference engines
    pub use crate::core::inference::{InferenceAdapter, OrtEngine, StaticEngine};
    pub use crate::core::traits::InferenceEngine;

    // Boundary types
    pub use crate::domain::{ExtractionMetadata, ExtractionResult, HealthStatus};

    // Pipeline (high-level API)
    pub use crate::pipeline::{ExtractOptions, ModelState, Pipeline};
}
