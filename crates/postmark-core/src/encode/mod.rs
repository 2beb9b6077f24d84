//! Image encoding pipeline.
//!
//! This module provides functionality for:
//! - Encoding rasters to JPEG at a `[0, 1]` quality factor
//! - Wrapping encoded bytes as self-describing `data:` URIs
//! - Lossless PNG output for clipboard targets

mod data_uri;
mod jpeg;
mod png;

pub use data_uri::{EncodedImage, MIME_JPEG, MIME_PNG};
pub use jpeg::{encode_jpeg, quality_from_factor, EncodeError};
pub use png::encode_png;

use crate::decode::RasterImage;

/// Serialize a raster to a JPEG [`EncodedImage`] at `quality` in `[0, 1]`.
///
/// The quality factor is validated before any work is done.
pub fn encode_raster(image: &RasterImage, quality: f32) -> Result<EncodedImage, EncodeError> {
    let jpeg_quality = quality_from_factor(quality)?;
    let bytes = encode_jpeg(&image.pixels, image.width, image.height, jpeg_quality)?;
    log::debug!(
        "encoded {}x{} at quality {} -> {} bytes",
        image.width,
        image.height,
        jpeg_quality,
        bytes.len()
    );
    Ok(EncodedImage::jpeg(bytes))
}

/// Serialize a raster to a PNG [`EncodedImage`].
pub fn encode_raster_png(image: &RasterImage) -> Result<EncodedImage, EncodeError> {
    encode_png(&image.pixels, image.width, image.height).map(EncodedImage::png)
}
