//! Image preparation for uploaded item photos.
//!
//! Every upload is normalized before it touches the blob store: the full
//! variant is bounded to [`MAX_EDGE`] pixels and re-encoded as JPEG under
//! [`MAX_BYTES`], stepping the quality down until the budget is met; the
//! thumbnail variant is bounded to [`THUMBNAIL_EDGE`] at a fixed quality.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

/// Maximum edge length of the full-size variant, in pixels.
pub const MAX_EDGE: u32 = 1200;

/// Byte-size ceiling for the full-size variant.
pub const MAX_BYTES: usize = 500 * 1024;

/// Initial JPEG quality for the full-size variant.
pub const START_QUALITY: u8 = 80;

/// Quality decrement applied while the encoded size exceeds [`MAX_BYTES`].
pub const QUALITY_STEP: u8 = 10;

/// Quality floor; once reached the result is accepted regardless of size.
pub const MIN_QUALITY: u8 = 10;

/// Maximum edge length of the thumbnail variant, in pixels.
pub const THUMBNAIL_EDGE: u32 = 300;

/// Fixed JPEG quality for the thumbnail variant.
pub const THUMBNAIL_QUALITY: u8 = 70;

/// Image preparation failures.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The supplied bytes are not a decodable raster image
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// JPEG re-encoding produced no output
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Both encoded variants of one uploaded image.
#[derive(Debug)]
pub struct PreparedImage {
    /// Full-size JPEG, bounded to [`MAX_EDGE`] and [`MAX_BYTES`]
    pub image: Vec<u8>,
    /// Thumbnail JPEG, bounded to [`THUMBNAIL_EDGE`]
    pub thumbnail: Vec<u8>,
}

/// Decode a user-supplied raster image and derive both variants.
///
/// Deterministic and synchronous; no storage is touched.
pub fn prepare(bytes: &[u8]) -> Result<PreparedImage, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    Ok(PreparedImage {
        image: optimize(&decoded)?,
        thumbnail: thumbnail(&decoded)?,
    })
}

/// Full-size variant: bounded resize, then iterative re-encoding until the
/// byte budget or the quality floor is reached, whichever comes first.
fn optimize(img: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let bounded = bound(img, MAX_EDGE);

    let mut quality = START_QUALITY;
    loop {
        let encoded = encode_jpeg(&bounded, quality)?;
        if encoded.len() <= MAX_BYTES || quality <= MIN_QUALITY {
            if encoded.len() > MAX_BYTES {
                tracing::warn!(
                    bytes = encoded.len(),
                    "image still over budget at minimum quality"
                );
            }
            return Ok(encoded);
        }
        quality -= QUALITY_STEP;
    }
}

/// Thumbnail variant at a fixed, lower quality.
fn thumbnail(img: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    encode_jpeg(&bound(img, THUMBNAIL_EDGE), THUMBNAIL_QUALITY)
}

/// Scale down preserving aspect ratio so that neither edge exceeds
/// `max_edge`. Images already within bounds are left untouched.
fn bound(img: &DynamicImage, max_edge: u32) -> DynamicImage {
    if img.width().max(img.height()) > max_edge {
        img.resize(max_edge, max_edge, FilterType::Triangle)
    } else {
        img.clone()
    }
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.encode_image(&rgb).map_err(ImageError::Encode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        // Pseudo-noise so JPEG compression actually has to work for it
        let img = RgbImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) as u8;
            image::Rgb([v, v.wrapping_add(85), v.wrapping_mul(3)])
        });
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .expect("png encoding");
        out
    }

    #[test]
    fn oversized_image_is_capped_preserving_aspect_ratio() {
        let prepared = prepare(&png_bytes(1600, 800)).unwrap();

        let full = image::load_from_memory(&prepared.image).unwrap();
        assert_eq!(full.width(), 1200);
        assert_eq!(full.height(), 600);

        let thumb = image::load_from_memory(&prepared.thumbnail).unwrap();
        assert_eq!(thumb.width(), 300);
        assert_eq!(thumb.height(), 150);
    }

    #[test]
    fn small_image_keeps_its_dimensions() {
        let prepared = prepare(&png_bytes(640, 480)).unwrap();
        let full = image::load_from_memory(&prepared.image).unwrap();
        assert_eq!((full.width(), full.height()), (640, 480));
    }

    #[test]
    fn full_variant_fits_the_byte_budget() {
        let prepared = prepare(&png_bytes(1600, 1600)).unwrap();
        assert!(prepared.image.len() <= MAX_BYTES);
        assert!(!prepared.thumbnail.is_empty());
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = prepare(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
