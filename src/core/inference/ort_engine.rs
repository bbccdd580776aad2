//! ONNX Runtime engine behind the [`InferenceEngine`] trait.

use crate::core::config::ExtractorConfig;
use crate::core::traits::InferenceEngine;
use crate::core::{ExtractError, Tensor4D};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::{TensorRef, ValueType};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// Inference engine bound to an ONNX Runtime session.
///
/// The session is created once at load time and is the only shared handle
/// requests touch. ONNX Runtime sessions take `&mut self` to run, so the
/// session sits behind a `Mutex`; the lock is held only around the single
/// `run` call, never around decoding or preprocessing.
pub struct OrtEngine {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_name: String,
    model_version: String,
    model_path: PathBuf,
}

impl std::fmt::Debug for OrtEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtEngine")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_name", &self.model_name)
            .field("model_version", &self.model_version)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OrtEngine {
    /// Loads the ONNX model named by the configuration and checks its
    /// declared input/output shapes against the configured contract.
    pub fn load(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let model = &config.model;
        let path = model.model_path.as_path();
        info!(model_path = %path.display(), "loading ONNX model");

        let mut builder = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?;
        if let Some(threads) = config.intra_threads {
            builder = builder.with_intra_threads(threads)?;
        }
        let session = builder.commit_from_file(path).map_err(|e| {
            ExtractError::inference_source(
                format!("Model loading failed for '{}'", path.display()),
                e,
            )
        })?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| ExtractError::inference("Model declares no inputs"))?;
        let input_name = input.name.clone();
        if let ValueType::Tensor { shape, .. } = &input.input_type {
            let dims: Vec<i64> = shape.iter().copied().collect();
            check_input_shape(&dims, model.input_size)?;
        }

        let output = session
            .outputs
            .first()
            .ok_or_else(|| ExtractError::inference("Model declares no outputs"))?;
        let output_name = output.name.clone();
        if let ValueType::Tensor { shape, .. } = &output.output_type {
            let dims: Vec<i64> = shape.iter().copied().collect();
            check_output_shape(&dims, model.feature_dimension)?;
        }

        info!(
            input = %input_name,
            output = %output_name,
            feature_dimension = model.feature_dimension,
            "ONNX model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_name: model.model_name.clone(),
            model_version: model.model_version.clone(),
            model_path: path.to_path_buf(),
        })
    }

    /// Returns the model path backing this engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }
}

impl InferenceEngine for OrtEngine {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn infer(&self, input: &Tensor4D) -> Result<Vec<f32>, ExtractError> {
        let input_shape = input.shape().to_vec();
        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            ExtractError::inference_source(
                format!("Failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self
            .session
            .lock()
            .map_err(|_| ExtractError::inference("Failed to acquire session lock"))?;
        let outputs = session.run(inputs).map_err(|e| {
            ExtractError::inference_source(
                format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ExtractError::inference_source(
                    format!(
                        "Failed to extract output tensor '{}' as f32",
                        self.output_name
                    ),
                    e,
                )
            })?;
        debug!(?output_shape, "inference call complete");

        // Single-input call: drop the batch dimension by flattening.
        Ok(output_data.to_vec())
    }
}

/// Checks a declared rank-4 NCHW input against the configured spatial size.
/// Dynamic dimensions (negative) are accepted; the runtime call still feeds
/// the fixed configured shape.
fn check_input_shape(dims: &[i64], input_size: (u32, u32)) -> Result<(), ExtractError> {
    if dims.len() != 4 {
        return Err(ExtractError::inference(format!(
            "Model input must be a rank-4 NCHW tensor, got shape {dims:?}"
        )));
    }
    let (height, width) = (input_size.0 as i64, input_size.1 as i64);
    if dims[1] > 0 && dims[1] != 3 {
        return Err(ExtractError::inference(format!(
            "Model input must have 3 channels, got {}",
            dims[1]
        )));
    }
    if (dims[2] > 0 && dims[2] != height) || (dims[3] > 0 && dims[3] != width) {
        return Err(ExtractError::inference(format!(
            "Model input size {:?} does not match configured {}x{}",
            &dims[2..], height, width
        )));
    }
    Ok(())
}

/// Checks that the declared output is consistent with the configured feature
/// dimension. Only static dimensions can be checked at load time; the
/// adapter re-checks the actual length on every call.
fn check_output_shape(dims: &[i64], feature_dimension: usize) -> Result<(), ExtractError> {
    let static_len: i64 = dims.iter().filter(|&&d| d > 0).product();
    let fully_static = dims.iter().all(|&d| d > 0);
    if fully_static && static_len != feature_dimension as i64 {
        return Err(ExtractError::inference(format!(
            "Model output shape {dims:?} does not match configured feature dimension {feature_dimension}"
        )));
    }
    Ok(())
}
