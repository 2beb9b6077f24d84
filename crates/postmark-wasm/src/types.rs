//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Postmark
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use postmark_core::decode::{FilterType, RasterImage};
use postmark_core::EncodeError;
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`.
///
/// `free()` releases WASM memory immediately; otherwise wasm-bindgen's
/// finalizer handles cleanup.
#[wasm_bindgen]
pub struct JsRasterImage {
    inner: RasterImage,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create a new image from dimensions and RGB pixel data (3 bytes per
    /// pixel, row-major order).
    ///
    /// Throws if `pixels.length` is not `width * height * 3`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterImage, JsValue> {
        checked_raster(width, height, pixels)
            .map(JsRasterImage::from_raster)
            .map_err(crate::to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGB pixel data as Uint8Array. This copies the buffer.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsRasterImage {
    pub(crate) fn from_raster(inner: RasterImage) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &RasterImage {
        &self.inner
    }
}

fn checked_raster(width: u32, height: u32, pixels: Vec<u8>) -> Result<RasterImage, EncodeError> {
    let expected = (width as u64) * (height as u64) * 3;
    if pixels.len() as u64 != expected {
        return Err(EncodeError::InvalidPixelData {
            expected: usize::try_from(expected).unwrap_or(usize::MAX),
            actual: pixels.len(),
        });
    }
    Ok(RasterImage::new(width, height, pixels))
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}
