//! JPEG encoding at a caller-supplied quality factor.
//!
//! The engine speaks in quality factors in `[0, 1]` (0.5 for storage, 0.4 for
//! thumbnails, 0.9 for watermarked shares). The encoder underneath takes an
//! integer quality in `1..=100`; [`quality_from_factor`] is the only bridge
//! between the two.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur while serializing a raster.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality factor outside `[0, 1]` or not a number
    #[error("Invalid quality factor {0}: must be between 0 and 1")]
    InvalidQuality(f32),

    /// The underlying codec refused to serialize the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Map a `[0, 1]` quality factor onto the JPEG encoder's `1..=100` scale.
///
/// Both extremes are accepted: `0.0` encodes at quality 1, `1.0` at 100.
pub fn quality_from_factor(factor: f32) -> Result<u8, EncodeError> {
    if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
        return Err(EncodeError::InvalidQuality(factor));
    }
    Ok(((factor * 100.0).round() as u8).clamp(1, 100))
}

pub(crate) fn validate_buffer(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, values outside are clamped)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
