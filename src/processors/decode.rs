//! Image decoding.
//!
//! Turns raw bytes that already passed validation into a canonical 3-channel
//! RGB buffer. Any color mode, including alpha variants, is flattened onto
//! RGB; alpha never carries extraction signal. The original dimensions and
//! detected format survive unaltered into the final result.

use crate::core::ExtractError;
use image::{ImageFormat, RgbImage};

/// Format tag reported when the decoder cannot name the source format.
pub const UNKNOWN_FORMAT: &str = "UNKNOWN";

/// A decoded image in canonical RGB layout plus source metadata.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// 8-bit RGB pixel buffer.
    pub pixels: RgbImage,
    /// Width of the source image, before any resizing.
    pub width: u32,
    /// Height of the source image, before any resizing.
    pub height: u32,
    /// Detected source format, or [`UNKNOWN_FORMAT`].
    pub format: String,
}

/// Parses raw bytes as an image and converts to canonical RGB.
///
/// # Errors
///
/// Returns a client-class [`ExtractError::Decode`] when the bytes are
/// truncated, corrupt, or not an image at all.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ExtractError> {
    let format = image::guess_format(bytes)
        .map(format_name)
        .unwrap_or(UNKNOWN_FORMAT);

    let img = image::load_from_memory(bytes).map_err(ExtractError::decode)?;
    let (width, height) = (img.width(), img.height());

    Ok(DecodedImage {
        pixels: img.to_rgb8(),
        width,
        height,
        format: format.to_string(),
    })
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Gif => "GIF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Tiff => "TIFF",
        _ => UNKNOWN_FORMAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(img: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_png_with_source_metadata() {
        let img = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let bytes = encode(image::DynamicImage::ImageRgb8(img), ImageFormat::Png);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.width, 64);
        assert_eq!(decoded.height, 48);
        assert_eq!(decoded.format, "PNG");
        assert_eq!(decoded.pixels.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn flattens_alpha_onto_rgb() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 128]));
        let bytes = encode(image::DynamicImage::ImageRgba8(img), ImageFormat::Png);

        let decoded = decode_image(&bytes).unwrap();
        // Three channels out regardless of the alpha plane in the source.
        assert_eq!(decoded.pixels.dimensions(), (8, 8));
        let px = decoded.pixels.get_pixel(3, 3);
        assert_eq!(px.0, [200, 100, 50]);
    }

    #[test]
    fn rejects_non_image_bytes_as_client_error() {
        let err = decode_image(b"definitely not an image payload").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn rejects_truncated_image() {
        let img = RgbImage::from_pixel(32, 32, Rgb([1, 2, 3]));
        let mut bytes = encode(image::DynamicImage::ImageRgb8(img), ImageFormat::Png);
        bytes.truncate(bytes.len() / 2);

        assert!(decode_image(&bytes).is_err());
    }
}
