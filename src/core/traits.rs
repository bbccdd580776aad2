//! The inference engine boundary.

use crate::core::{ExtractError, Tensor4D};

/// Contract between the pipeline and an inference engine.
///
/// An engine accepts exactly one NCHW tensor of the configured shape and
/// returns the raw (unnormalized) feature output for that single input. It
/// performs no other numeric work; preprocessing and normalization live in
/// the pipeline.
///
/// Implementations must be safe to share across request threads. An engine
/// whose backend is not internally safe for concurrent invocation (such as
/// an ONNX Runtime session) must serialize its own calls; see
/// [`OrtEngine`](crate::core::inference::OrtEngine).
///
/// The engine used by a pipeline is selected at construction. Production
/// code binds [`OrtEngine`](crate::core::inference::OrtEngine); tests bind
/// the deterministic [`StaticEngine`](crate::core::inference::StaticEngine).
pub trait InferenceEngine: std::fmt::Debug + Send + Sync {
    /// The model name reported in extraction results.
    fn model_name(&self) -> &str;

    /// The model version reported in extraction results.
    fn model_version(&self) -> &str;

    /// Runs inference on a single input tensor and returns the flat raw
    /// feature output.
    fn infer(&self, input: &Tensor4D) -> Result<Vec<f32>, ExtractError>;
}
