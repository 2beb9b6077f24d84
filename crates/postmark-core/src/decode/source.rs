//! Where an image to be decoded comes from.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::encode::EncodedImage;

use super::{decode_image, DecodeError, RasterImage};

/// Input accepted by every engine operation.
///
/// Uploads arrive as file bytes or a local path; re-watermarking and thumbnail
/// backfill start from an already encoded image.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Raw file bytes, e.g. from a browser `File`.
    Bytes(Vec<u8>),
    /// A local file on disk.
    File(PathBuf),
    /// A previously produced `data:` URI.
    Encoded(EncodedImage),
}

impl ImageSource {
    /// Build a source from a URL string.
    ///
    /// Only `data:` URIs are readable. Any other URL would need a
    /// cross-origin fetch the engine does not perform, so it is reported as
    /// `DecodeError::RemoteSource` rather than silently skipped.
    pub fn from_url(url: &str) -> Result<Self, DecodeError> {
        let trimmed = url.trim();
        if trimmed.starts_with("data:") {
            return trimmed.parse::<EncodedImage>().map(ImageSource::Encoded);
        }
        Err(DecodeError::RemoteSource(trimmed.to_string()))
    }

    /// Load the undecoded bytes behind this source.
    pub fn load_bytes(&self) -> Result<Cow<'_, [u8]>, DecodeError> {
        match self {
            ImageSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            ImageSource::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| DecodeError::IoError(format!("{}: {}", path.display(), e))),
            ImageSource::Encoded(encoded) => Ok(Cow::Borrowed(encoded.as_bytes())),
        }
    }

    /// Decode into a raster, refusing images above `max_pixels`.
    pub fn decode(&self, max_pixels: u64) -> Result<RasterImage, DecodeError> {
        let bytes = self.load_bytes()?;
        decode_image(&bytes, max_pixels)
    }
}

impl From<EncodedImage> for ImageSource {
    fn from(value: EncodedImage) -> Self {
        ImageSource::Encoded(value)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(value: Vec<u8>) -> Self {
        ImageSource::Bytes(value)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(value: PathBuf) -> Self {
        ImageSource::File(value)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Bytes(bytes) => write!(f, "{} bytes", bytes.len()),
            ImageSource::File(path) => write!(f, "{}", path.display()),
            ImageSource::Encoded(encoded) => {
                write!(f, "{} ({} bytes)", encoded.mime(), encoded.as_bytes().len())
            }
        }
    }
}
