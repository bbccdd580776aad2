//! Error types for the feature extraction pipeline.
//!
//! Every failure the pipeline can surface falls into a two-tier taxonomy:
//! client-class errors (the request was bad: disallowed content type,
//! oversized payload, bytes that do not parse as an image) and server-class
//! errors (the model is unavailable, the engine failed, or an internal fault
//! occurred). The class maps directly to an HTTP-style status code at the
//! transport boundary.
//!
//! Internal faults deliberately render a fixed generic message via `Display`;
//! the diagnostic context is retained on the variant for logging only and is
//! never shown to callers.

use thiserror::Error;

/// The two error classes exposed at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent something the pipeline cannot accept (400).
    Client,
    /// The pipeline or its inference engine failed (500).
    Server,
}

impl ErrorClass {
    /// HTTP-style status code for this class.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorClass::Client => 400,
            ErrorClass::Server => 500,
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Client => write!(f, "client"),
            ErrorClass::Server => write!(f, "server"),
        }
    }
}

/// Errors raised by the feature extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The request failed pre-decode validation (content type or size).
    #[error("{message}")]
    Validation {
        /// Names the violated constraint and the allowed set or limit.
        message: String,
    },

    /// The payload bytes do not parse as a supported image.
    #[error("Failed to decode image: {source}")]
    Decode {
        /// The underlying parse failure.
        #[source]
        source: image::ImageError,
    },

    /// The inference engine is unavailable, failed, or broke its contract.
    #[error("{message}")]
    Inference {
        /// Describes the engine failure.
        message: String,
        /// The underlying engine error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from the ONNX Runtime session.
    #[error("inference session: {0}")]
    Session(#[from] ort::Error),

    /// Any other internal fault during preprocessing or normalization.
    ///
    /// The `Display` text is a fixed generic message; `context` is kept for
    /// logging and never leaks to callers.
    #[error("Internal error during feature extraction")]
    Internal {
        /// Diagnostic detail, log-only.
        context: String,
    },

    /// Invalid configuration, rejected at startup before any request runs.
    #[error("configuration: {message}")]
    Config {
        /// Describes the invalid value.
        message: String,
    },
}

/// Convenient result alias for pipeline operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

impl ExtractError {
    /// Returns the error class this error belongs to.
    ///
    /// The pipeline never reclassifies: a client-class error stays
    /// client-class all the way to the caller.
    pub fn class(&self) -> ErrorClass {
        match self {
            ExtractError::Validation { .. } | ExtractError::Decode { .. } => ErrorClass::Client,
            ExtractError::Inference { .. }
            | ExtractError::Session(_)
            | ExtractError::Internal { .. }
            | ExtractError::Config { .. } => ErrorClass::Server,
        }
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        self.class().status_code()
    }

    /// Creates a validation error for a content type outside the allow-list.
    pub fn unsupported_format(content_type: &str, allowed: &[String]) -> Self {
        ExtractError::Validation {
            message: format!(
                "Unsupported image format: {}. Supported formats: {}",
                content_type,
                allowed.join(", ")
            ),
        }
    }

    /// Creates a validation error for a payload over the configured limit.
    pub fn payload_too_large(actual: usize, max: usize) -> Self {
        ExtractError::Validation {
            message: format!(
                "Image size exceeds maximum allowed size of {:.1} MB ({} bytes)",
                max as f64 / (1024.0 * 1024.0),
                actual
            ),
        }
    }

    /// Creates a decode error from the image parser's failure.
    pub fn decode(source: image::ImageError) -> Self {
        ExtractError::Decode { source }
    }

    /// Creates the readiness-gate error returned while the model is not loaded.
    pub fn model_not_available() -> Self {
        ExtractError::Inference {
            message: "Feature extraction model not available".to_string(),
            source: None,
        }
    }

    /// Creates an inference error with a message only.
    pub fn inference(message: impl Into<String>) -> Self {
        ExtractError::Inference {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an inference error wrapping an engine failure.
    pub fn inference_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExtractError::Inference {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an inference error for an output that broke the shape contract.
    pub fn output_length_mismatch(expected: usize, actual: usize) -> Self {
        ExtractError::Inference {
            message: format!(
                "Inference output length mismatch: expected {expected} features, engine returned {actual}"
            ),
            source: None,
        }
    }

    /// Creates an internal error whose public message is generic.
    pub fn internal(context: impl Into<String>) -> Self {
        ExtractError::Internal {
            context: context.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ExtractError::Config {
            message: message.into(),
        }
    }
}
