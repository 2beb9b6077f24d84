//! Byte-level decoding into [`RasterImage`] with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};

use super::{DecodeError, Orientation, RasterImage};

/// Decode any supported image (JPEG, PNG, GIF or WebP) from bytes, applying
/// EXIF orientation so the raster matches what a browser would draw.
///
/// # Errors
///
/// * `DecodeError::Empty` if `bytes` is empty
/// * `DecodeError::InvalidFormat` if the format is unknown or not compiled in
/// * `DecodeError::CorruptedFile` if decoding fails part way
/// * `DecodeError::TooLarge` if the header reports more than `max_pixels`
/// * `DecodeError::EmptyImage` if the image has a zero dimension
pub fn decode_image(bytes: &[u8], max_pixels: u64) -> Result<RasterImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = read_dynamic(bytes, max_pixels)?;
    let oriented = apply_orientation(img, orientation);
    finish(oriented)
}

/// Read width and height from the image header without decoding pixels.
pub fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    guessed_reader(bytes)?
        .into_dimensions()
        .map_err(decode_failure)
}

/// Extract EXIF orientation value from image bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

fn read_dynamic(bytes: &[u8], max_pixels: u64) -> Result<DynamicImage, DecodeError> {
    let (width, height) = inspect_dimensions(bytes)?;
    check_pixel_budget(width, height, max_pixels)?;

    guessed_reader(bytes)?.decode().map_err(decode_failure)
}

fn decode_failure(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

fn check_pixel_budget(width: u32, height: u32, limit: u64) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage);
    }
    if width as u64 * height as u64 > limit {
        return Err(DecodeError::TooLarge {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

fn finish(img: DynamicImage) -> Result<RasterImage, DecodeError> {
    let raster = RasterImage::from_rgb_image(img.into_rgb8());
    if raster.is_empty() {
        return Err(DecodeError::EmptyImage);
    }
    log::debug!("decoded {}x{} raster", raster.width, raster.height);
    Ok(raster)
}

/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::gradient_bytes;
    use super::*;
    use image::ImageFormat;

    const LIMIT: u64 = 40_000_000;

    /// Insert an APP1 Exif segment carrying only an Orientation tag right
    /// after the JPEG SOI marker.
    fn with_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        #[rustfmt::skip]
        let tiff = [
            b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // little-endian, IFD0 at 8
            0x01, 0x00,                                     // one entry
            0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, // Orientation, SHORT, count 1
            orientation, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,                         // no next IFD
        ];
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);
        let len = (payload.len() + 2) as u16;

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_png() {
        let bytes = gradient_bytes(32, 16, ImageFormat::Png);
        let img = decode_image(&bytes, LIMIT).unwrap();

        assert_eq!(img.dimensions(), (32, 16));
        assert_eq!(img.pixels.len(), 32 * 16 * 3);
    }

    #[test]
    fn test_decode_jpeg() {
        let bytes = gradient_bytes(20, 10, ImageFormat::Jpeg);
        let img = decode_image(&bytes, LIMIT).unwrap();
        assert_eq!(img.dimensions(), (20, 10));
    }

    #[test]
    fn test_decode_gif() {
        // 1x1 GIF89a, single transparent pixel
        let bytes = [
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF,
            0xFF, 0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00,
            0x3B,
        ];
        let img = decode_image(&bytes, LIMIT).unwrap();
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.pixels.len(), 3);
    }

    #[test]
    fn test_decode_webp() {
        let bytes = gradient_bytes(24, 12, ImageFormat::WebP);
        let img = decode_image(&bytes, LIMIT).unwrap();
        assert_eq!(img.dimensions(), (24, 12));
    }

    #[test]
    fn test_decode_recognised_but_unsupported_format() {
        // BMP signature; the bmp codec is not enabled
        let mut bytes = b"BM".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            decode_image(&bytes, LIMIT),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let bytes = with_orientation(&gradient_bytes(8, 4, ImageFormat::Jpeg), 6);
        assert_eq!(get_orientation(&bytes), Orientation::Rotate90CW);

        let img = decode_image(&bytes, LIMIT).unwrap();
        assert_eq!(img.dimensions(), (4, 8));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[], LIMIT), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03], LIMIT);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = gradient_bytes(64, 64, ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(decode_image(truncated, LIMIT).is_err());
    }

    #[test]
    fn test_decode_respects_pixel_budget() {
        let bytes = gradient_bytes(20, 20, ImageFormat::Png);
        match decode_image(&bytes, 100) {
            Err(DecodeError::TooLarge {
                width,
                height,
                limit,
            }) => {
                assert_eq!((width, height, limit), (20, 20, 100));
            }
            other => panic!("Expected TooLarge, got: {:?}", other),
        }
    }

    #[test]
    fn test_inspect_dimensions() {
        let bytes = gradient_bytes(33, 7, ImageFormat::Png);
        assert_eq!(inspect_dimensions(&bytes).unwrap(), (33, 7));
    }

    #[test]
    fn test_orientation_without_exif() {
        let bytes = gradient_bytes(4, 4, ImageFormat::Jpeg);
        assert_eq!(get_orientation(&bytes), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let rgb_img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb_img), Orientation::Rotate90CW);
        assert_eq!(result.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let rgb_img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(
            DynamicImage::ImageRgb8(rgb_img),
            Orientation::FlipHorizontal,
        )
        .into_rgb8();

        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
