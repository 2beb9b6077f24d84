//! Timestamp watermarking for shared posts.
//!
//! A short text (normally the post time, see [`stamp_text`]) is composited in
//! semi-transparent white at three anchors: bottom-right, top-left and
//! center. Redundant faint stamps survive simple cropping without covering
//! the picture.
//!
//! # Layout
//!
//! - font size = `max(min_font_size, width / width_divisor)` (12 and 50 by default)
//! - padding is a fixed pixel count (15), independent of image size
//! - bottom-right: `x = width - text_width - padding`, `y = height - padding`
//! - top-left: `x = padding`, `y = padding + font_size`
//! - center: `x = (width - text_width) / 2`, `y = height / 2`
//!
//! `y` is the text baseline. Positions are never clamped; text wider than
//! the image is clipped at the edges.

mod glyphs;
mod layout;
mod text;

pub use glyphs::{for_each_covered_pixel, measure_text, GLYPH_CELL};
pub use layout::{
    font_size_for_width, layout_stamps, StampAnchor, StampLayout, StampPosition, STAMP_POSITIONS,
};
pub use text::{stamp_text, stamp_text_now};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::decode::RasterImage;

/// Visual parameters for the stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    /// Distance from the image edge in pixels.
    pub padding: f32,
    /// Stamp opacity (0.0 to 1.0).
    pub opacity: f32,
    /// Smallest font size in pixels.
    pub min_font_size: f32,
    /// Font size is `width / width_divisor` above the minimum.
    pub width_divisor: f32,
    /// Stamp colour.
    pub color: [u8; 3],
    /// Quality factor for the watermarked output (0.0 to 1.0).
    pub quality: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            padding: 15.0,
            opacity: 0.15,
            min_font_size: 12.0,
            width_divisor: 50.0,
            color: [255, 255, 255],
            quality: 0.9,
        }
    }
}

/// What to stamp and where. Built per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkSpec {
    pub text: String,
    pub positions: Vec<StampPosition>,
}

impl WatermarkSpec {
    /// Stamp `text` at all three anchors.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            positions: STAMP_POSITIONS.to_vec(),
        }
    }

    /// Stamp the post time `at`.
    pub fn at<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::new(stamp_text(at))
    }

    /// Stamp the current local time.
    pub fn now() -> Self {
        Self::new(stamp_text_now())
    }
}

/// Composite `spec` onto a copy of `image`.
///
/// The source raster is left untouched so it can be stamped again, e.g. for a
/// preview and then for the final share. Output dimensions always equal the
/// input dimensions.
pub fn apply_watermark(
    image: &RasterImage,
    spec: &WatermarkSpec,
    style: &WatermarkStyle,
) -> RasterImage {
    let mut canvas = image.clone();
    let layout = layout_stamps(image.width, image.height, &spec.text, &spec.positions, style);
    let alpha = style.opacity.clamp(0.0, 1.0);

    log::debug!(
        "stamping {:?} at {} positions, font {}px, text width {}px",
        spec.text,
        layout.anchors.len(),
        layout.font_size,
        layout.text_width
    );

    for anchor in &layout.anchors {
        stamp_once(&mut canvas, &spec.text, layout.font_size, anchor, style.color, alpha);
    }
    canvas
}

fn stamp_once(
    canvas: &mut RasterImage,
    text: &str,
    font_size: f32,
    anchor: &StampAnchor,
    color: [u8; 3],
    alpha: f32,
) {
    let (width, height) = (canvas.width as i64, canvas.height as i64);
    let pixels = &mut canvas.pixels;

    for_each_covered_pixel(text, font_size, anchor.x, anchor.baseline, |x, y| {
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        let offset = ((y * width + x) * 3) as usize;
        for (channel, src) in pixels[offset..offset + 3].iter_mut().zip(color) {
            *channel = blend(*channel, src, alpha);
        }
    });
}

/// Source-over blend of an opaque colour at `alpha`.
fn blend(dst: u8, src: u8, alpha: f32) -> u8 {
    (dst as f32 * (1.0 - alpha) + src as f32 * alpha)
        .round()
        .clamp(0.0, 255.0) as u8
}
