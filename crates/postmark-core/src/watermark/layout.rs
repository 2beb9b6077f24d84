//! Where the three stamps go.

use serde::{Deserialize, Serialize};

use super::glyphs::measure_text;
use super::WatermarkStyle;

/// One of the fixed stamp anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StampPosition {
    BottomRight,
    TopLeft,
    Center,
}

/// Every stamp, in drawing order.
pub const STAMP_POSITIONS: [StampPosition; 3] = [
    StampPosition::BottomRight,
    StampPosition::TopLeft,
    StampPosition::Center,
];

impl StampPosition {
    /// Left edge and baseline for text `text_width` wide.
    ///
    /// `x` is not clamped: text wider than the image yields a negative `x`
    /// and the stamp is clipped when drawn.
    pub fn anchor(
        self,
        width: u32,
        height: u32,
        text_width: f32,
        font_size: f32,
        padding: f32,
    ) -> (f32, f32) {
        let (w, h) = (width as f32, height as f32);
        match self {
            StampPosition::BottomRight => (w - text_width - padding, h - padding),
            StampPosition::TopLeft => (padding, padding + font_size),
            StampPosition::Center => ((w - text_width) / 2.0, h / 2.0),
        }
    }
}

/// A resolved anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampAnchor {
    pub position: StampPosition,
    pub x: f32,
    pub baseline: f32,
}

/// Font size, measured width and anchors for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct StampLayout {
    pub font_size: f32,
    pub text_width: f32,
    pub anchors: Vec<StampAnchor>,
}

/// Font size scales with image width, floored at the style minimum.
pub fn font_size_for_width(width: u32, style: &WatermarkStyle) -> f32 {
    (width as f32 / style.width_divisor).max(style.min_font_size)
}

pub fn layout_stamps(
    width: u32,
    height: u32,
    text: &str,
    positions: &[StampPosition],
    style: &WatermarkStyle,
) -> StampLayout {
    let font_size = font_size_for_width(width, style);
    let text_width = measure_text(text, font_size);

    let anchors = positions
        .iter()
        .map(|&position| {
            let (x, baseline) =
                position.anchor(width, height, text_width, font_size, style.padding);
            StampAnchor {
                position,
                x,
                baseline,
            }
        })
        .collect();

    StampLayout {
        font_size,
        text_width,
        anchors,
    }
}
