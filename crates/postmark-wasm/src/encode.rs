//! Image encoding WASM bindings.
//!
//! Every output is a `data:<mime>;base64,...` string that can be stored in a
//! record field or assigned to an `<img src>` directly.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode pixels as a JPEG data URI
//! - [`compress_for_storage`] - Upload-time storage copy (600px, quality 0.5)
//! - [`create_thumbnail`] - Upload-time thumbnail (150px, quality 0.4)
//! - [`prepare_upload`] - Both of the above from one decode
//! - [`thumbnail_from_data_uri`] - Thumbnail backfill for stored images
//!
//! # Example
//!
//! ```typescript
//! import { compress_for_storage, create_thumbnail } from '@postmark/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! await saveImage({ url: compress_for_storage(bytes), thumbnail: create_thumbnail(bytes) });
//! ```

use postmark_core::decode::ImageSource;
use postmark_core::{EncodedImage, EngineError};
use wasm_bindgen::prelude::*;

use crate::engine;
use crate::types::JsRasterImage;

/// Encode an image as a JPEG data URI at `quality` in `[0, 1]`.
#[wasm_bindgen]
pub fn encode_image(image: &JsRasterImage, quality: f32) -> Result<String, JsValue> {
    engine()
        .encode(image.raster(), quality)
        .map(|encoded| encoded.to_data_uri())
        .map_err(crate::to_js)
}

#[wasm_bindgen]
pub fn compress_for_storage(bytes: &[u8]) -> Result<String, JsValue> {
    storage_copy(bytes).map_err(crate::to_js)
}

#[wasm_bindgen]
pub fn create_thumbnail(bytes: &[u8]) -> Result<String, JsValue> {
    engine()
        .create_thumbnail(&ImageSource::Bytes(bytes.to_vec()))
        .map(|encoded| encoded.to_data_uri())
        .map_err(crate::to_js)
}

/// Storage copy and thumbnail as `{ url, thumbnail }`.
#[wasm_bindgen]
pub fn prepare_upload(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let prepared = engine()
        .prepare_upload(&ImageSource::Bytes(bytes.to_vec()))
        .map_err(crate::to_js)?;
    serde_wasm_bindgen::to_value(&prepared).map_err(crate::to_js)
}

/// Derive a thumbnail from an already stored image.
#[wasm_bindgen]
pub fn thumbnail_from_data_uri(uri: &str) -> Result<String, JsValue> {
    backfill_thumbnail(uri).map_err(crate::to_js)
}

fn storage_copy(bytes: &[u8]) -> Result<String, EngineError> {
    engine()
        .compress_for_storage(&ImageSource::Bytes(bytes.to_vec()))
        .map(|encoded| encoded.to_data_uri())
}

fn backfill_thumbnail(uri: &str) -> Result<String, EngineError> {
    let stored: EncodedImage = uri.parse()?;
    engine()
        .create_thumbnail(&ImageSource::Encoded(stored))
        .map(|encoded| encoded.to_data_uri())
}
