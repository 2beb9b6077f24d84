//! Postmark WASM - WebAssembly bindings for the Postmark image engine
//!
//! This crate exposes postmark-core to the browser portal. Images cross the
//! boundary as `Uint8Array` file bytes or `data:` URI strings; every fallible
//! call throws a string error.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Decoding and proportional resize
//! - `encode` - Storage compression, thumbnails and plain encoding
//! - `watermark` - Share-time watermark and clipboard PNG
//! - `access` - Role and route checks
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_for_storage, add_watermark, stamp_text_now } from '@postmark/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const url = compress_for_storage(bytes);
//! const shared = add_watermark(url, stamp_text_now());
//! ```

use std::fmt::Display;

use log::LevelFilter;
use postmark_core::ImageEngine;
use wasm_bindgen::prelude::*;

mod access;
mod decode;
mod encode;
mod logging;
mod types;
mod watermark;

pub use access::{can_access_route, effective_tenant, has_permission};
pub use decode::{decode_data_uri, decode_image, resize_to_fit};
pub use encode::{
    compress_for_storage, create_thumbnail, encode_image, prepare_upload, thumbnail_from_data_uri,
};
pub use types::JsRasterImage;
pub use watermark::{add_watermark, stamp_text_now, to_clipboard_png};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(LevelFilter::Info);
    log::debug!("postmark-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Engine with the portal defaults.
pub(crate) fn engine() -> ImageEngine {
    ImageEngine::default()
}

pub(crate) fn to_js<E: Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}
