//! Text measurement and rasterization with an embedded 8x8 bitmap face.
//!
//! A glyph occupies a square cell `font_size` pixels wide and tall, so text
//! metrics depend only on the character count and the font size. That keeps
//! `measure_text` reproducible across platforms, which a system font lookup
//! would not be.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

/// Bitmap rows and columns per glyph.
pub const GLYPH_CELL: u32 = 8;

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Rendered width of `text` in pixels at `font_size`.
pub fn measure_text(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size
}

/// Visit every pixel covered by `text` drawn with its left edge at `x` and
/// its baseline at `baseline`.
///
/// The glyph cell sits entirely above the baseline. Coordinates may be
/// negative or beyond the canvas; clipping is the caller's job. Cells are
/// half-open on both axes so no pixel is visited twice for one call.
pub fn for_each_covered_pixel<F>(text: &str, font_size: f32, x: f32, baseline: f32, mut visit: F)
where
    F: FnMut(i64, i64),
{
    let scale = font_size / GLYPH_CELL as f32;
    let top = baseline - font_size;

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as f32 * font_size;
        let rows = glyph(ch);

        for (row, bits) in rows.iter().enumerate() {
            let y0 = (top + row as f32 * scale).floor() as i64;
            let y1 = (top + (row + 1) as f32 * scale).floor() as i64;

            for col in 0..GLYPH_CELL {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let x0 = (origin_x + col as f32 * scale).floor() as i64;
                let x1 = (origin_x + (col + 1) as f32 * scale).floor() as i64;

                for py in y0..y1 {
                    for px in x0..x1 {
                        visit(px, py);
                    }
                }
            }
        }
    }
}
