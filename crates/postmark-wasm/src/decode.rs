//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG, PNG, GIF or WebP file into RGB pixels
//! - [`decode_data_uri`] - Decode a stored `data:` URI into RGB pixels
//! - [`resize_to_fit`] - Downscale an image so its longer edge fits a bound
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@postmark/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_fit(image, 600, 1);
//! console.log(`Preview: ${preview.width}x${preview.height}`);
//! ```

use postmark_core::decode::{ImageSource, RasterImage};
use postmark_core::EngineError;
use wasm_bindgen::prelude::*;

use crate::engine;
use crate::types::{filter_from_u8, JsRasterImage};

/// Decode a JPEG, PNG, GIF or WebP file, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are empty, not a supported format,
/// corrupted, or larger than the configured pixel limit.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode_source(ImageSource::Bytes(bytes.to_vec()))
        .map(JsRasterImage::from_raster)
        .map_err(crate::to_js)
}

/// Decode a `data:` URI produced by the encoder.
///
/// Non-`data:` URLs are rejected: the engine does not fetch remote images.
#[wasm_bindgen]
pub fn decode_data_uri(uri: &str) -> Result<JsRasterImage, JsValue> {
    ImageSource::from_url(uri)
        .map_err(EngineError::from)
        .and_then(decode_source)
        .map(JsRasterImage::from_raster)
        .map_err(crate::to_js)
}

/// Resize to fit within `max_edge` while preserving aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is upscaled.
///
/// `filter`: 0=Nearest, 1=Bilinear (default), 2=Lanczos3.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsRasterImage,
    max_edge: u32,
    filter: u8,
) -> Result<JsRasterImage, JsValue> {
    fit_raster(image.raster(), max_edge, filter)
        .map(JsRasterImage::from_raster)
        .map_err(crate::to_js)
}

fn fit_raster(image: &RasterImage, max_edge: u32, filter: u8) -> Result<RasterImage, EngineError> {
    engine()
        .with_resize_filter(filter_from_u8(filter))
        .resize(image, max_edge)
}

fn decode_source(source: ImageSource) -> Result<RasterImage, EngineError> {
    engine().decode(&source)
}
