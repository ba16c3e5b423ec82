//! Image identification backed by the `image` crate.

use std::io::Cursor;

use ::image::ImageReader;

use super::{DecodedImage, ImageDecoder, ImageFormat};

/// Identifies images with the `image` crate's format guessing and header
/// readers. Stricter than [`HeaderDecoder`](super::HeaderDecoder): malformed
/// headers that the sniffer would accept are rejected here.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, data: &[u8]) -> Option<DecodedImage> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .ok()?;
        let format = match reader.format()? {
            ::image::ImageFormat::Bmp => ImageFormat::Bmp,
            ::image::ImageFormat::Gif => ImageFormat::Gif,
            ::image::ImageFormat::Jpeg => ImageFormat::Jpeg,
            ::image::ImageFormat::Png => ImageFormat::Png,
            _ => return None,
        };
        let (width, height) = reader.into_dimensions().ok()?;
        Some(DecodedImage {
            format,
            width,
            height,
        })
    }
}
