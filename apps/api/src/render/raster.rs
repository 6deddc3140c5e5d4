//! Prepares encoded images for embedding as PDF image XObjects.

use image::{ColorType, DynamicImage, ImageFormat};
use miniz_oxide::deflate::compress_to_vec_zlib;
use thiserror::Error;

const FLATE_LEVEL: u8 = 6;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error(transparent)]
    Decode(#[from] image::ImageError),

    #[error("image has zero width or height")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFilter {
    /// The original JPEG bytes.
    Dct,
    Flate,
}

/// Image data ready to be written as an XObject stream.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub filter: StreamFilter,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Flate-compressed 8-bit alpha channel, when the source has transparency.
    pub alpha_mask: Option<Vec<u8>>,
}

/// Decodes `data` and re-encodes it for PDF embedding.
///
/// Baseline RGB JPEGs pass through untouched; everything else becomes
/// Flate-compressed RGB plus an optional soft mask.
pub fn encode(data: &[u8]) -> Result<EncodedImage, RasterError> {
    let decoded = image::load_from_memory(data)?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(RasterError::Empty);
    }

    let is_jpeg = matches!(image::guess_format(data), Ok(ImageFormat::Jpeg));
    if is_jpeg && decoded.color() == ColorType::Rgb8 {
        return Ok(EncodedImage {
            filter: StreamFilter::Dct,
            bytes: data.to_vec(),
            width,
            height,
            alpha_mask: None,
        });
    }

    Ok(flate_encode(&decoded))
}

fn flate_encode(decoded: &DynamicImage) -> EncodedImage {
    let alpha_mask = decoded.color().has_alpha().then(|| {
        let rgba = decoded.to_rgba8();
        let alphas: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        compress_to_vec_zlib(&alphas, FLATE_LEVEL)
    });

    EncodedImage {
        filter: StreamFilter::Flate,
        bytes: compress_to_vec_zlib(decoded.to_rgb8().as_raw(), FLATE_LEVEL),
        width: decoded.width(),
        height: decoded.height(),
        alpha_mask,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_bytes(with_alpha: bool) -> Vec<u8> {
        let image = if with_alpha {
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 128])))
        } else {
            DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([10, 20, 30])))
        };
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    pub(crate) fn jpeg_bytes() -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 100, 50])));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageOutputFormat::Jpeg(80)).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_is_flate_encoded() {
        let encoded = encode(&png_bytes(false)).unwrap();
        assert_eq!(encoded.filter, StreamFilter::Flate);
        assert_eq!((encoded.width, encoded.height), (4, 3));
        assert!(encoded.alpha_mask.is_none());
    }

    #[test]
    fn test_png_with_alpha_gets_mask() {
        let encoded = encode(&png_bytes(true)).unwrap();
        assert!(encoded.alpha_mask.is_some());
    }

    #[test]
    fn test_rgb_jpeg_passes_through() {
        let jpeg = jpeg_bytes();
        let encoded = encode(&jpeg).unwrap();
        assert_eq!(encoded.filter, StreamFilter::Dct);
        assert_eq!(encoded.bytes, jpeg);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            encode(b"definitely not an image"),
            Err(RasterError::Decode(_))
        ));
    }
}
