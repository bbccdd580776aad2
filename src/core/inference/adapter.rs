//! Thin call boundary between the pipeline and an inference engine.

use crate::core::traits::InferenceEngine;
use crate::core::{ExtractError, Tensor4D};
use std::sync::Arc;

/// Wraps an engine handle and enforces the output-length contract.
///
/// The adapter owns no numeric logic. Each call passes one tensor through
/// the engine and verifies that the raw output has exactly the configured
/// feature dimension; anything else is a server-class contract violation.
#[derive(Debug, Clone)]
pub struct InferenceAdapter {
    engine: Arc<dyn InferenceEngine>,
    feature_dimension: usize,
}

impl InferenceAdapter {
    /// Creates an adapter around a loaded engine.
    pub fn new(engine: Arc<dyn InferenceEngine>, feature_dimension: usize) -> Self {
        Self {
            engine,
            feature_dimension,
        }
    }

    /// The model name reported by the underlying engine.
    pub fn model_name(&self) -> &str {
        self.engine.model_name()
    }

    /// The model version reported by the underlying engine.
    pub fn model_version(&self) -> &str {
        self.engine.model_version()
    }

    /// The feature dimension this adapter enforces per call.
    pub fn feature_dimension(&self) -> usize {
        self.feature_dimension
    }

    /// Runs one inference call and checks the output length.
    pub fn run(&self, input: &Tensor4D) -> Result<Vec<f32>, ExtractError> {
        let output = self.engine.infer(input)?;
        if output.len() != self.feature_dimension {
            return Err(ExtractError::output_length_mismatch(
                self.feature_dimension,
                output.len(),
            ));
        }
        Ok(output)
    }
}
