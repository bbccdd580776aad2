//! Inference engines and the adapter that enforces their contract.
//!
//! [`OrtEngine`] binds the pipeline to an ONNX Runtime session;
//! [`StaticEngine`] is a deterministic in-process stand-in used by tests.
//! Both sit behind the [`InferenceAdapter`], which checks the per-call
//! output length against the configured feature dimension.

pub mod adapter;
pub mod ort_engine;
pub mod static_engine;

pub use adapter::InferenceAdapter;
pub use ort_engine::OrtEngine;
pub use static_engine::StaticEngine;
