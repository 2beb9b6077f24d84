//! Self-contained encoded images in `data:<mime>;base64,<payload>` form.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::decode::DecodeError;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// A compressed image together with its media type.
///
/// This is the only image form that is stored in records or handed to share
/// targets. It carries no identity beyond its bytes and needs nothing else to
/// be decoded again.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime: String,
    bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wrap already-encoded bytes.
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Wrap JPEG bytes.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(MIME_JPEG, bytes)
    }

    /// Wrap PNG bytes.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(MIME_PNG, bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// File extension matching the media type, for share file names.
    pub fn file_extension(&self) -> &'static str {
        match self.mime.as_str() {
            MIME_JPEG | "image/jpg" => "jpg",
            MIME_PNG => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "img",
        }
    }

    /// Render as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Parse a base64 `data:` URI whose media type is an image type.
    pub fn parse(uri: &str) -> Result<Self, DecodeError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| DecodeError::InvalidDataUri("missing `data:` prefix".into()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| DecodeError::InvalidDataUri("missing `,` separator".into()))?;

        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| DecodeError::InvalidDataUri("only base64 payloads are supported".into()))?
            .to_ascii_lowercase();

        if !mime.starts_with("image/") {
            return Err(DecodeError::InvalidDataUri(format!(
                "`{}` is not an image media type",
                mime
            )));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DecodeError::InvalidDataUri(e.to_string()))?;

        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        Ok(Self::new(mime, bytes))
    }
}

impl FromStr for EncodedImage {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data_uri())
    }
}

// The payload can be megabytes of base64; keep debug output readable.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for EncodedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for EncodedImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        uri.parse().map_err(serde::de::Error::custom)
    }
}
