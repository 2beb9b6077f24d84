//! Share-time WASM bindings: watermarking and clipboard conversion.
//!
//! ```typescript
//! import { add_watermark, stamp_text_now, to_clipboard_png } from '@postmark/wasm';
//!
//! const stamped = add_watermark(image.url, stamp_text_now());
//! const png = to_clipboard_png(stamped);
//! await navigator.clipboard.write([
//!   new ClipboardItem({ 'image/png': new Blob([png], { type: 'image/png' }) }),
//! ]);
//! ```

use postmark_core::{clipboard_png, EncodedImage, EngineError};
use wasm_bindgen::prelude::*;

use crate::engine;

/// Stamp `text` at the bottom-right, top-left and center of a stored image.
///
/// Returns a new JPEG data URI at quality 0.9 with the same dimensions. The
/// input string is not modified, so it can be stamped again later.
#[wasm_bindgen]
pub fn add_watermark(uri: &str, text: &str) -> Result<String, JsValue> {
    watermark_uri(uri, text).map_err(crate::to_js)
}

/// Current local time as `D/M H:MM`.
#[wasm_bindgen]
pub fn stamp_text_now() -> String {
    postmark_core::stamp_text_now()
}

/// Re-encode a data URI as PNG bytes for `navigator.clipboard.write`.
#[wasm_bindgen]
pub fn to_clipboard_png(uri: &str) -> Result<Vec<u8>, JsValue> {
    png_bytes(uri).map_err(crate::to_js)
}

fn watermark_uri(uri: &str, text: &str) -> Result<String, EngineError> {
    let image: EncodedImage = uri.parse()?;
    engine()
        .watermark(&image, text)
        .map(|stamped| stamped.to_data_uri())
}

fn png_bytes(uri: &str) -> Result<Vec<u8>, EngineError> {
    let image: EncodedImage = uri.parse()?;
    clipboard_png(&engine(), &image).map(EncodedImage::into_bytes)
}
