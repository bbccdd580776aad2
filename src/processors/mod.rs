//! Image processing stages of the extraction pipeline.
//!
//! * [`decode`] - parses raw bytes into a canonical RGB pixel buffer
//! * [`preprocess`] - turns decoded pixels into the model's NCHW input tensor
//! * [`normalize`] - L2 normalization of the raw feature output

pub mod decode;
pub mod normalize;
pub mod preprocess;

pub use decode::{DecodedImage, decode_image};
pub use normalize::{NORM_EPSILON, l2_normalize};
pub use preprocess::Preprocessor;
