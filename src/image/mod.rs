//! Image decoding and ingestion.
//!
//! Decoders only identify an image: format and pixel dimensions. The bytes are
//! stored in the book unchanged.

mod header;
mod ingest;
#[cfg(feature = "image")]
mod raster;

pub use header::HeaderDecoder;
pub use ingest::{ImageRole, IngestedImage, ingest};
#[cfg(feature = "image")]
pub use raster::RasterDecoder;

#[cfg(test)]
pub(crate) use header::fixtures;

use crate::archive::Compression;

/// Image formats a book can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Bmp,
    Gif,
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Get the MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// File extension, including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => ".bmp",
            ImageFormat::Gif => ".gif",
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Png => ".png",
        }
    }

    /// Bitmaps are uncompressed and worth deflating; the rest already are.
    pub fn compression(self) -> Compression {
        match self {
            ImageFormat::Bmp => Compression::Deflated,
            ImageFormat::Gif | ImageFormat::Jpeg | ImageFormat::Png => Compression::Stored,
        }
    }
}

/// What a decoder learned about an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Identifies image data.
pub trait ImageDecoder {
    /// Returns `None` if the data is not a recognized image.
    fn decode(&self, data: &[u8]) -> Option<DecodedImage>;
}

impl<D: ImageDecoder + ?Sized> ImageDecoder for &D {
    fn decode(&self, data: &[u8]) -> Option<DecodedImage> {
        (**self).decode(data)
    }
}

impl<D: ImageDecoder + ?Sized> ImageDecoder for Box<D> {
    fn decode(&self, data: &[u8]) -> Option<DecodedImage> {
        (**self).decode(data)
    }
}
