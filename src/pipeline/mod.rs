//! The extraction pipeline: orchestrator and readiness state machine.
//!
//! A [`Pipeline`] is constructed once at process start. Loading the model is
//! attempted exactly once; on failure the pipeline stays alive in a degraded
//! `Failed` state where every extract call is rejected up front, but health
//! reporting keeps working. There is no hot reload.
//!
//! Per request the stages run strictly in order: validator, decoder,
//! preprocessor, inference adapter, normalizer. All stages are synchronous;
//! there are no internal retries and no cancellation points. Shared state
//! after load is read-only; each request owns its tensor and output buffers.

mod validator;

pub use validator::RequestValidator;

use crate::core::config::ExtractorConfig;
use crate::core::inference::{InferenceAdapter, OrtEngine};
use crate::core::traits::InferenceEngine;
use crate::core::{ExtractError, ExtractResult};
use crate::domain::{ExtractionMetadata, ExtractionResult, HealthStatus};
use crate::processors::{Preprocessor, decode_image, l2_normalize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Readiness states of the pipeline.
///
/// Transitions are `Unloaded -> Loading -> Ready` or
/// `Unloaded -> Loading -> Failed`, once, at construction. There is no way
/// back to `Unloaded` or `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// No load has been attempted yet.
    Unloaded,
    /// The one-time load attempt is in progress.
    Loading,
    /// The model loaded and requests can be served.
    Ready,
    /// The load attempt failed; the process keeps running degraded.
    Failed,
}

impl std::fmt::Display for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelState::Unloaded => write!(f, "unloaded"),
            ModelState::Loading => write!(f, "loading"),
            ModelState::Ready => write!(f, "ready"),
            ModelState::Failed => write!(f, "failed"),
        }
    }
}

/// Per-request options for [`Pipeline::extract`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Opaque caller-supplied identifier, passed through unmodified and
    /// never validated.
    pub image_id: Option<String>,
    /// Whether to include source image metadata in the result.
    pub return_metadata: bool,
}

impl ExtractOptions {
    /// Attaches an image identifier.
    pub fn with_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    /// Requests source image metadata in the result.
    pub fn with_metadata(mut self) -> Self {
        self.return_metadata = true;
        self
    }
}

/// Orchestrates the extraction stages and owns the model handle.
#[derive(Debug)]
pub struct Pipeline {
    config: ExtractorConfig,
    validator: RequestValidator,
    preprocessor: Preprocessor,
    adapter: Option<InferenceAdapter>,
    state: ModelState,
}

impl Pipeline {
    /// Builds the pipeline and attempts the one-time ONNX model load.
    ///
    /// Configuration errors are fatal and returned immediately. A model
    /// load failure is not: the pipeline is returned in the `Failed` state
    /// and keeps serving health reports while rejecting extract calls.
    pub fn load(config: ExtractorConfig) -> ExtractResult<Self> {
        config.validate()?;
        let validator = RequestValidator::from_config(&config);
        let preprocessor = Preprocessor::from_config(&config.model)?;

        let state = ModelState::Loading;
        info!(
            service = %config.service_name,
            model = %config.model.model_name,
            state = %state,
            "initializing extraction pipeline"
        );

        let (adapter, state) = match OrtEngine::load(&config) {
            Ok(engine) => {
                let adapter =
                    InferenceAdapter::new(Arc::new(engine), config.model.feature_dimension);
                (Some(adapter), ModelState::Ready)
            }
            Err(e) => {
                error!(error = %e, "model load failed; serving in degraded state");
                (None, ModelState::Failed)
            }
        };

        Ok(Self {
            config,
            validator,
            preprocessor,
            adapter,
            state,
        })
    }

    /// Builds a pipeline around an explicitly provided engine.
    ///
    /// This is the construction-time seam for engine selection: production
    /// callers use [`Pipeline::load`]; tests and offline tooling pass a
    /// [`StaticEngine`](crate::core::inference::StaticEngine) here.
    pub fn with_engine(
        config: ExtractorConfig,
        engine: Arc<dyn InferenceEngine>,
    ) -> ExtractResult<Self> {
        config.validate()?;
        let validator = RequestValidator::from_config(&config);
        let preprocessor = Preprocessor::from_config(&config.model)?;
        let adapter = InferenceAdapter::new(engine, config.model.feature_dimension);

        Ok(Self {
            config,
            validator,
            preprocessor,
            adapter: Some(adapter),
            state: ModelState::Ready,
        })
    }

    /// Builds a pipeline whose load attempt is considered failed.
    ///
    /// Used when the engine is known to be unavailable; every extract call
    /// is rejected with a readiness error while health reporting stays up.
    pub fn without_engine(config: ExtractorConfig) -> ExtractResult<Self> {
        config.validate()?;
        let validator = RequestValidator::from_config(&config);
        let preprocessor = Preprocessor::from_config(&config.model)?;

        Ok(Self {
            config,
            validator,
            preprocessor,
            adapter: None,
            state: ModelState::Failed,
        })
    }

    /// Current readiness state.
    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Whether the pipeline can serve extract calls.
    pub fn is_ready(&self) -> bool {
        self.state == ModelState::Ready
    }

    /// The configuration this pipeline was built from.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Readiness report: the service is always healthy once up, and
    /// `model_loaded` reflects the `Ready` state.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            service: self.config.service_name.clone(),
            version: self.config.service_version.clone(),
            model_loaded: self.is_ready(),
        }
    }

    /// Runs the full extraction sequence on one image.
    ///
    /// The readiness gate runs before the input is touched at all. The
    /// reported duration covers validation through normalization. Client
    /// errors surface unchanged; internal faults surface with a fixed
    /// generic message.
    pub fn extract(
        &self,
        bytes: &[u8],
        content_type: &str,
        options: ExtractOptions,
    ) -> ExtractResult<ExtractionResult> {
        let Some(adapter) = self.adapter.as_ref().filter(|_| self.is_ready()) else {
            warn!(state = %self.state, "extract rejected: model not available");
            return Err(ExtractError::model_not_available());
        };

        let started = Instant::now();

        self.validator
            .validate(content_type, bytes.len())
            .inspect_err(|e| warn!(content_type, payload_len = bytes.len(), error = %e, "request rejected"))?;

        let decoded = decode_image(bytes)
            .inspect_err(|e| warn!(error = %e, "image decode failed"))?;

        let tensor = self.preprocessor.apply(&decoded).inspect_err(|e| {
            if let ExtractError::Internal { context } = e {
                error!(context = %context, "internal fault during preprocessing");
            }
        })?;
        let mut features = adapter.run(&tensor).inspect_err(|e| match e {
            ExtractError::Internal { context } => {
                error!(context = %context, "internal fault during inference")
            }
            other => error!(error = %other, "inference failed"),
        })?;
        l2_normalize(&mut features);

        let processing_time_ms = round2(started.elapsed().as_secs_f64() * 1000.0);
        let feature_dimension = features.len();
        debug!(
            image_id = options.image_id.as_deref(),
            feature_dimension,
            processing_time_ms,
            "feature extraction successful"
        );

        let metadata = options.return_metadata.then(|| ExtractionMetadata {
            width: decoded.width,
            height: decoded.height,
            format: decoded.format.clone(),
        });

        Ok(ExtractionResult {
            image_id: options.image_id,
            features,
            feature_dimension,
            model_name: adapter.model_name().to_string(),
            model_version: adapter.model_version().to_string(),
            processing_time_ms,
            metadata,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
