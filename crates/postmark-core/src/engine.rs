//! The image transform engine.
//!
//! [`ImageEngine`] ties the resizer, re-encoder and watermarker together for
//! the three use cases of the portal: storage compression on upload,
//! thumbnail generation (on upload and as a backfill), and watermarking at
//! share time. Every call decodes, transforms and encodes one image and keeps
//! no state between calls.

use serde::Serialize;

use crate::batch::{run_batch, BatchReport, CancelToken};
use crate::config::{EncodeProfile, EngineConfig};
use crate::decode::{resize_to_fit, DecodeError, FilterType, ImageSource, RasterImage};
use crate::encode::{encode_raster, quality_from_factor, EncodedImage};
use crate::error::EngineError;
use crate::watermark::{apply_watermark, WatermarkSpec};

/// Storage copy and thumbnail produced from a single decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedUpload {
    pub url: EncodedImage,
    pub thumbnail: EncodedImage,
}

#[derive(Debug, Clone, Default)]
pub struct ImageEngine {
    config: EngineConfig,
}

impl ImageEngine {
    /// Create an engine, rejecting an unusable configuration.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Same engine, resampling with `filter`.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.config.resize_filter = filter;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode a source at native resolution.
    pub fn decode(&self, source: &ImageSource) -> Result<RasterImage, EngineError> {
        let image = source.decode(self.config.max_decoded_pixels)?;
        log::debug!("decoded {} -> {}x{}", source, image.width, image.height);
        Ok(image)
    }

    /// Downscale so the longer edge is at most `max_edge`. Never upscales.
    pub fn resize(&self, image: &RasterImage, max_edge: u32) -> Result<RasterImage, EngineError> {
        check_max_edge(max_edge)?;
        Ok(resize_to_fit(image, max_edge, self.config.resize_filter)?)
    }

    /// Serialize to a self-contained JPEG at `quality` in `[0, 1]`.
    ///
    /// A zero-sized raster is reported as a decode failure, since no usable
    /// source can produce one.
    pub fn encode(&self, image: &RasterImage, quality: f32) -> Result<EncodedImage, EngineError> {
        check_quality(quality)?;
        if image.is_empty() {
            return Err(DecodeError::EmptyImage.into());
        }
        Ok(encode_raster(image, quality)?)
    }

    /// Decode, resize to `max_edge` and encode at `quality`.
    ///
    /// Both parameters are validated before the source is touched.
    pub fn resize_and_encode(
        &self,
        source: &ImageSource,
        max_edge: u32,
        quality: f32,
    ) -> Result<EncodedImage, EngineError> {
        check_max_edge(max_edge)?;
        check_quality(quality)?;

        let image = self.decode(source)?;
        self.render(&image, EncodeProfile { max_edge, quality })
    }

    /// Storage copy: 600px, quality 0.5 by default.
    pub fn compress_for_storage(&self, source: &ImageSource) -> Result<EncodedImage, EngineError> {
        let profile = self.config.storage;
        self.resize_and_encode(source, profile.max_edge, profile.quality)
    }

    /// Thumbnail: 150px, quality 0.4 by default.
    pub fn create_thumbnail(&self, source: &ImageSource) -> Result<EncodedImage, EngineError> {
        let profile = self.config.thumbnail;
        self.resize_and_encode(source, profile.max_edge, profile.quality)
    }

    /// Storage copy and thumbnail for a new upload, sharing one decode.
    ///
    /// The thumbnail is scaled from the original raster rather than from the
    /// already compressed storage copy.
    pub fn prepare_upload(&self, source: &ImageSource) -> Result<PreparedUpload, EngineError> {
        let image = self.decode(source)?;
        let url = self.render(&image, self.config.storage)?;
        let thumbnail = self.render(&image, self.config.thumbnail)?;
        Ok(PreparedUpload { url, thumbnail })
    }

    /// Stamp `text` at the three anchors and re-encode at the watermark
    /// quality. The input is never modified.
    pub fn watermark(&self, image: &EncodedImage, text: &str) -> Result<EncodedImage, EngineError> {
        self.watermark_with(image, &WatermarkSpec::new(text))
    }

    /// [`ImageEngine::watermark`] with an explicit set of positions.
    pub fn watermark_with(
        &self,
        image: &EncodedImage,
        spec: &WatermarkSpec,
    ) -> Result<EncodedImage, EngineError> {
        let style = &self.config.watermark;
        let raster = self.decode(&ImageSource::Encoded(image.clone()))?;
        let stamped = apply_watermark(&raster, spec, style);
        self.encode(&stamped, style.quality)
    }

    /// Watermark several images one after another with the same text.
    ///
    /// Items are labelled `image-1`, `image-2` and so on, matching the file
    /// names used when sharing.
    pub fn watermark_batch(
        &self,
        images: &[EncodedImage],
        text: &str,
        cancel: Option<&CancelToken>,
    ) -> BatchReport<EncodedImage> {
        let spec = WatermarkSpec::new(text);
        let inputs = images
            .iter()
            .enumerate()
            .map(|(i, image)| (format!("image-{}", i + 1), image));
        run_batch(inputs, cancel, |image| self.watermark_with(image, &spec))
    }

    fn render(&self, image: &RasterImage, profile: EncodeProfile) -> Result<EncodedImage, EngineError> {
        let resized = self.resize(image, profile.max_edge)?;
        self.encode(&resized, profile.quality)
    }
}

fn check_max_edge(max_edge: u32) -> Result<(), EngineError> {
    if max_edge == 0 {
        return Err(EngineError::invalid("max_edge", "must be greater than zero"));
    }
    Ok(())
}

fn check_quality(quality: f32) -> Result<(), EngineError> {
    quality_from_factor(quality)
        .map(|_| ())
        .map_err(|_| EngineError::invalid("quality", format!("{} is outside [0, 1]", quality)))
}
