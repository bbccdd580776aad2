//! Deterministic in-process engine for tests and offline development.

use crate::core::traits::InferenceEngine;
use crate::core::{ExtractError, Tensor4D};

#[derive(Debug, Clone)]
enum Response {
    /// Output derived from a checksum of the input tensor: identical inputs
    /// produce identical outputs, different inputs almost surely differ.
    Checksum,
    /// A fixed output returned for every call.
    Fixed(Vec<f32>),
}

/// An [`InferenceEngine`] with no model behind it.
///
/// Stands in for [`OrtEngine`](crate::core::inference::OrtEngine) wherever a
/// real ONNX session is unavailable or unwanted: unit and integration tests,
/// and offline smoke runs. Selected via pipeline construction, exactly like
/// the real engine.
#[derive(Debug, Clone)]
pub struct StaticEngine {
    feature_dimension: usize,
    response: Response,
    model_name: String,
    model_version: String,
}

impl StaticEngine {
    /// Creates an engine whose output is a deterministic function of the
    /// input tensor.
    pub fn new(feature_dimension: usize) -> Self {
        Self {
            feature_dimension,
            response: Response::Checksum,
            model_name: "static".to_string(),
            model_version: "v0".to_string(),
        }
    }

    /// Creates an engine that returns an all-zero raw output, exercising the
    /// degenerate normalization path.
    pub fn all_zero(feature_dimension: usize) -> Self {
        Self::with_output(vec![0.0; feature_dimension])
    }

    /// Creates an engine that returns the given output on every call.
    pub fn with_output(output: Vec<f32>) -> Self {
        Self {
            feature_dimension: output.len(),
            response: Response::Fixed(output),
            model_name: "static".to_string(),
            model_version: "v0".to_string(),
        }
    }
}

impl InferenceEngine for StaticEngine {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn infer(&self, input: &Tensor4D) -> Result<Vec<f32>, ExtractError> {
        match &self.response {
            Response::Fixed(output) => Ok(output.clone()),
            Response::Checksum => {
                let seed: f32 = input
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| v * ((i % 97) as f32 + 1.0))
                    .sum();
                Ok((0..self.feature_dimension)
                    .map(|i| (seed + i as f32 * 0.37).sin())
                    .collect())
            }
        }
    }
}
