//! Tensor preprocessing for the model input.
//!
//! The steps run in a fixed order: bilinear resize to the configured input
//! size, scale of 8-bit channel values into [0, 1], per-channel
//! `(value - mean) / std` normalization, HWC to CHW transpose, and a batch
//! dimension of 1. Scale and normalization are folded into a single
//! multiply-add per channel (`alpha = scale / std`, `beta = -mean / std`).
//!
//! The whole stage is pure: identical decoded pixels produce bit-identical
//! tensors. Bilinear interpolation is the contract (output values are
//! sensitive to the interpolation choice), pinned to the `image` crate's
//! `Triangle` filter; bit-for-bit output across library versions is not
//! guaranteed beyond that pin.

use crate::core::config::ModelConfig;
use crate::core::{ExtractError, Tensor4D};
use crate::processors::decode::DecodedImage;
use image::imageops::FilterType;

/// Builds the model's NCHW input tensor from decoded pixels.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    target_height: u32,
    target_width: u32,
    /// Per-channel scaling factors (alpha = scale / std).
    alpha: [f32; 3],
    /// Per-channel offsets (beta = -mean / std).
    beta: [f32; 3],
}

impl Preprocessor {
    /// Creates a preprocessor for the given input size and normalization
    /// statistics.
    pub fn new(
        input_size: (u32, u32),
        mean: [f32; 3],
        std: [f32; 3],
    ) -> Result<Self, ExtractError> {
        let (height, width) = input_size;
        if height == 0 || width == 0 {
            return Err(ExtractError::config(format!(
                "Input size must be positive, got {height}x{width}"
            )));
        }
        for (i, &s) in std.iter().enumerate() {
            if !(s.is_finite() && s > 0.0) {
                return Err(ExtractError::config(format!(
                    "Standard deviation at index {i} must be positive and finite, got {s}"
                )));
            }
        }

        let scale = 1.0 / 255.0;
        let mut alpha = [0.0f32; 3];
        let mut beta = [0.0f32; 3];
        for c in 0..3 {
            alpha[c] = scale / std[c];
            beta[c] = -mean[c] / std[c];
        }

        Ok(Self {
            target_height: height,
            target_width: width,
            alpha,
            beta,
        })
    }

    /// Creates a preprocessor from the model configuration.
    pub fn from_config(model: &ModelConfig) -> Result<Self, ExtractError> {
        Self::new(
            model.input_size,
            model.normalization_mean,
            model.normalization_std,
        )
    }

    /// The fixed output shape produced by [`apply`](Self::apply).
    pub fn output_shape(&self) -> [usize; 4] {
        [
            1,
            3,
            self.target_height as usize,
            self.target_width as usize,
        ]
    }

    /// Resizes, normalizes, and reshapes a decoded image into the model's
    /// input tensor.
    pub fn apply(&self, image: &DecodedImage) -> Result<Tensor4D, ExtractError> {
        let resized = image::imageops::resize(
            &image.pixels,
            self.target_width,
            self.target_height,
            FilterType::Triangle,
        );

        let (height, width) = (self.target_height as usize, self.target_width as usize);
        let mut data = vec![0.0f32; 3 * height * width];
        for c in 0..3 {
            let plane = c * height * width;
            for y in 0..height {
                let row = plane + y * width;
                for x in 0..width {
                    let value = resized.get_pixel(x as u32, y as u32)[c] as f32;
                    data[row + x] = value * self.alpha[c] + self.beta[c];
                }
            }
        }

        Tensor4D::from_shape_vec((1, 3, height, width), data).map_err(|e| {
            ExtractError::internal(format!(
                "failed to shape {height}x{width} input tensor: {e}"
            ))
        })
    }
}
