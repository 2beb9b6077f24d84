//! Engine configuration.
//!
//! Defaults reproduce the portal's behaviour: storage copies capped at 600px
//! and quality 0.5, thumbnails at 150px and quality 0.4, watermarked shares
//! at quality 0.9. Every field can be overridden from JSON; missing fields
//! keep their defaults.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::error::EngineError;
use crate::watermark::WatermarkStyle;

/// Resize bound and quality for one kind of output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodeProfile {
    /// Longest edge in pixels.
    pub max_edge: u32,
    /// Lossy quality factor (0.0 to 1.0).
    pub quality: f32,
}

impl EncodeProfile {
    pub const STORAGE: EncodeProfile = EncodeProfile {
        max_edge: 600,
        quality: 0.5,
    };

    pub const THUMBNAIL: EncodeProfile = EncodeProfile {
        max_edge: 150,
        quality: 0.4,
    };

    fn validate(&self, name: &str) -> Result<(), EngineError> {
        if self.max_edge == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "{}.max_edge must be greater than zero",
                name
            )));
        }
        check_unit(&format!("{}.quality", name), self.quality)
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upload-time storage copy.
    pub storage: EncodeProfile,
    /// Upload-time and backfill thumbnails.
    pub thumbnail: EncodeProfile,
    /// Share-time watermark.
    pub watermark: WatermarkStyle,
    /// Resampling filter for downscaling.
    pub resize_filter: FilterType,
    /// Images with more pixels than this are refused before full decode.
    pub max_decoded_pixels: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage: EncodeProfile::STORAGE,
            thumbnail: EncodeProfile::THUMBNAIL,
            watermark: WatermarkStyle::default(),
            resize_filter: FilterType::Bilinear,
            max_decoded_pixels: 40_000_000,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.storage.validate("storage")?;
        self.thumbnail.validate("thumbnail")?;

        let wm = &self.watermark;
        check_unit("watermark.opacity", wm.opacity)?;
        check_unit("watermark.quality", wm.quality)?;
        if !(wm.min_font_size.is_finite() && wm.min_font_size > 0.0) {
            return Err(EngineError::InvalidConfig(
                "watermark.min_font_size must be positive".into(),
            ));
        }
        if !(wm.width_divisor.is_finite() && wm.width_divisor > 0.0) {
            return Err(EngineError::InvalidConfig(
                "watermark.width_divisor must be positive".into(),
            ));
        }
        if !wm.padding.is_finite() {
            return Err(EngineError::InvalidConfig(
                "watermark.padding must be finite".into(),
            ));
        }
        if self.max_decoded_pixels == 0 {
            return Err(EngineError::InvalidConfig(
                "max_decoded_pixels must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn check_unit(name: &str, value: f32) -> Result<(), EngineError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.storage.max_edge, 600);
        assert_eq!(config.storage.quality, 0.5);
        assert_eq!(config.thumbnail.max_edge, 150);
        assert_eq!(config.thumbnail.quality, 0.4);
        assert_eq!(config.watermark.quality, 0.9);
        assert_eq!(config.watermark.padding, 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = EngineConfig::from_json(
            r#"{ "thumbnail": { "max_edge": 200, "quality": 0.6 }, "resize_filter": "lanczos3" }"#,
        )
        .unwrap();

        assert_eq!(config.thumbnail.max_edge, 200);
        assert_eq!(config.resize_filter, FilterType::Lanczos3);
        assert_eq!(config.storage, EncodeProfile::STORAGE);
    }

    #[test]
    fn test_from_json_empty_object() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_from_json_rejects_bad_quality() {
        let result = EngineConfig::from_json(r#"{ "storage": { "max_edge": 600, "quality": 1.5 } }"#);
        assert!(matches!(result, Err(EngineError::InvalidConfig(msg)) if msg.contains("storage.quality")));
    }

    #[test]
    fn test_from_json_rejects_zero_edge() {
        let result = EngineConfig::from_json(r#"{ "thumbnail": { "max_edge": 0, "quality": 0.4 } }"#);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_watermark_fields() {
        let mut config = EngineConfig::default();
        config.watermark.width_divisor = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.watermark.opacity = -0.1;
        assert!(config.validate().is_err());
    }
}
