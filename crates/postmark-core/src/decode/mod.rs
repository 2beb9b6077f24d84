//! Image decoding pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, GIF and WebP bytes into an RGB [`RasterImage`]
//! - Reading sources (file bytes, paths, `data:` URIs)
//! - Max-edge resizing for storage copies and thumbnails
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded. Each call decodes one
//! image fully into memory, so batch callers process images one at a time.

mod raster;
mod resize;
mod source;
mod types;

pub use raster::{decode_image, get_orientation, inspect_dimensions};
pub use resize::{fit_dimensions, resize, resize_to_fit};
pub use source::ImageSource;
pub use types::{DecodeError, FilterType, Orientation, RasterImage};

#[cfg(test)]
pub(crate) use raster::fixtures;
