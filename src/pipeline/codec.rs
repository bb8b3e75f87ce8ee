//! Image decode and JPEG normalisation.
//!
//! Every accepted image, whatever its container format or pixel layout,
//! is decoded with the `image` crate and re-encoded as baseline RGB JPEG.
//! That single normalised form is what the PDF stage embeds verbatim via
//! a DCTDecode filter, so no PDF-side colour handling is needed.
//!
//! ## Why re-encode even JPEG inputs?
//! An input JPEG may be progressive, CMYK, or carry an orientation tag the
//! viewer would honour but the raw stream would not. Decoding to pixels
//! and re-encoding gives one uniform, viewer-safe representation.

use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;
use tracing::debug;

/// File extensions accepted as images, lower-case without the dot.
///
/// Shared by both discovery paths (directory walk and ZIP entry listing).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// True when `name` carries an accepted image extension
/// (case-insensitive).
pub fn has_image_extension(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|accepted| ext.eq_ignore_ascii_case(accepted))
}

/// A decoded image, normalised to an RGB JPEG stream.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel width of the source image.
    pub width: u32,
    /// Pixel height of the source image.
    pub height: u32,
    /// Baseline JPEG bytes, 8-bit RGB.
    pub jpeg: Vec<u8>,
}

/// Decode `bytes` and re-encode as RGB JPEG at the given quality.
///
/// Fails on undecodable bytes and on degenerate zero-pixel images; the
/// caller records the failure and skips the page.
pub fn decode(bytes: &[u8], jpeg_quality: u8) -> Result<DecodedImage, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(image::ImageError::Parameter(
            image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ),
        ));
    }

    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality).encode_image(&rgb)?;

    debug!(width, height, jpeg_len = jpeg.len(), "decoded image");
    Ok(DecodedImage {
        width,
        height,
        jpeg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("encode png");
        buf
    }

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert!(has_image_extension("photo.png"));
        assert!(has_image_extension("PHOTO.JPG"));
        assert!(has_image_extension("scan.Jpeg"));
        assert!(has_image_extension("anim.gif"));
        assert!(has_image_extension("old.BMP"));
        assert!(!has_image_extension("notes.txt"));
        assert!(!has_image_extension("archive.zip"));
        assert!(!has_image_extension("noextension"));
    }

    #[test]
    fn decodes_rgb_png_with_correct_dimensions() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([200, 10, 10])));
        let out = decode(&png_bytes(src), 90).expect("decode");
        assert_eq!((out.width, out.height), (40, 30));
        // JPEG streams start with the SOI marker.
        assert_eq!(&out.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn grayscale_input_is_normalised_to_rgb_jpeg() {
        let src = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([128])));
        let out = decode(&png_bytes(src), 90).expect("decode");
        let round = image::load_from_memory(&out.jpeg).expect("reload jpeg");
        assert!(matches!(round.color(), image::ColorType::Rgb8));
    }

    #[test]
    fn corrupt_bytes_are_an_error() {
        assert!(decode(b"definitely not an image", 90).is_err());
    }

    #[test]
    fn truncated_png_is_an_error() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([0, 0, 0])));
        let bytes = png_bytes(src);
        assert!(decode(&bytes[..bytes.len() / 2], 90).is_err());
    }
}
