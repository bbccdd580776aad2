//! Core types for the feature extraction pipeline.
//!
//! This module provides the error taxonomy, validated configuration, the
//! inference engine boundary, and shared tensor aliases used by the rest of
//! the crate.

pub mod config;
pub mod errors;
pub mod inference;
pub mod traits;
pub mod validation;

pub use errors::{ErrorClass, ExtractError, ExtractResult};
pub use traits::InferenceEngine;

/// 4D tensor in NCHW layout (batch, channel, height, width).
///
/// The pipeline only ever produces tensors with a batch dimension of 1;
/// the spatial dimensions are fixed by configuration and never vary across
/// inputs.
pub type Tensor4D = ndarray::Array4<f32>;
