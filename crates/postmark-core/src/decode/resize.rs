//! Max-edge resizing shared by storage compression and thumbnail generation.
//!
//! Both call sites run the same arithmetic with a different `max_edge`.
//! All functions return new `RasterImage` instances without modifying the input.

use super::{DecodeError, FilterType, RasterImage};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &RasterImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Pixel buffer does not match dimensions".into()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(RasterImage::from_rgb_image(resized))
}

/// Resize an image so its longest edge is at most `max_edge`, preserving
/// aspect ratio.
///
/// Images that already fit are returned unchanged (pixel-identical copy);
/// this never upscales.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if `max_edge` is zero.
pub fn resize_to_fit(
    image: &RasterImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<RasterImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }

    let (new_width, new_height) = fit_dimensions(image.width, image.height, max_edge);
    if (new_width, new_height) == image.dimensions() {
        return Ok(image.clone());
    }

    log::debug!(
        "resizing {}x{} -> {}x{} (max edge {})",
        image.width,
        image.height,
        new_width,
        new_height,
        max_edge
    );
    resize(image, new_width, new_height, filter)
}

/// Target dimensions for fitting `width`x`height` inside a `max_edge` square.
///
/// The longer edge becomes exactly `max_edge`; the shorter edge is scaled by
/// the same ratio and rounded half-away-from-zero, never below 1px. When both
/// edges already fit, the input dimensions are returned.
pub fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    if width >= height {
        let new_height = (height as f64 * max_edge as f64 / width as f64).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (width as f64 * max_edge as f64 / height as f64).round() as u32;
        (new_width.max(1), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.dimensions(), (50, 25));
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(resize(&img, 0, 50, FilterType::Bilinear).is_err());
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_to_fit_storage_landscape() {
        let img = create_test_image(1200, 600);
        let resized = resize_to_fit(&img, 600, FilterType::Bilinear).unwrap();
        assert_eq!(resized.dimensions(), (600, 300));
    }

    #[test]
    fn test_resize_to_fit_thumbnail_portrait() {
        let img = create_test_image(400, 1000);
        let resized = resize_to_fit(&img, 150, FilterType::Bilinear).unwrap();
        assert_eq!(resized.dimensions(), (60, 150));
    }

    #[test]
    fn test_resize_to_fit_already_smaller_is_identical() {
        let img = create_test_image(100, 80);
        let resized = resize_to_fit(&img, 600, FilterType::Bilinear).unwrap();

        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_to_fit_exactly_max_edge_untouched() {
        let img = create_test_image(150, 90);
        let resized = resize_to_fit(&img, 150, FilterType::Lanczos3).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_to_fit_zero_max_edge_error() {
        let img = create_test_image(100, 50);
        assert!(matches!(
            resize_to_fit(&img, 0, FilterType::Bilinear),
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_resize_to_fit_thumbnail_edge() {
        let img = create_test_image(900, 600);
        let thumb = resize_to_fit(&img, 150, FilterType::Bilinear).unwrap();
        assert_eq!(thumb.dimensions(), (150, 100));
    }

    #[test]
    fn test_fit_dimensions_rounds_to_nearest() {
        // 1000 * 600 / 1500 = 400 exactly, 1001 * 600 / 1500 = 400.4, 1003 -> 401.2
        assert_eq!(fit_dimensions(1500, 1000, 600), (600, 400));
        assert_eq!(fit_dimensions(1500, 1001, 600), (600, 400));
        assert_eq!(fit_dimensions(1500, 1003, 600), (600, 401));
        // 6000x4000 at 2560: 1706.67 rounds up
        assert_eq!(fit_dimensions(6000, 4000, 2560), (2560, 1707));
    }

    #[test]
    fn test_fit_dimensions_square() {
        assert_eq!(fit_dimensions(4000, 4000, 150), (150, 150));
    }

    #[test]
    fn test_fit_dimensions_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_dimensions(10_000, 2, 150), (150, 1));
        assert_eq!(fit_dimensions(2, 10_000, 150), (1, 150));
    }

    #[test]
    fn test_fit_dimensions_zero_input() {
        assert_eq!(fit_dimensions(0, 0, 256), (0, 0));
    }
}
