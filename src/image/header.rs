//! Header-only image identification.

use super::{DecodedImage, ImageDecoder, ImageFormat};

/// Identifies BMP, GIF, JPEG and PNG data by parsing header bytes.
///
/// No pixel data is decoded, so a truncated file with an intact header is
/// still accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl ImageDecoder for HeaderDecoder {
    fn decode(&self, data: &[u8]) -> Option<DecodedImage> {
        let format = detect_format(data)?;
        let (width, height) = match format {
            ImageFormat::Png => png_dimensions(data)?,
            ImageFormat::Jpeg => jpeg_dimensions(data)?,
            ImageFormat::Gif => gif_dimensions(data)?,
            ImageFormat::Bmp => bmp_dimensions(data)?,
        };
        Some(DecodedImage {
            format,
            width,
            height,
        })
    }
}

/// Detect the image format from magic bytes.
pub(crate) fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if data.starts_with(b"BM") {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// PNG: width/height at bytes 16-23 in the IHDR chunk.
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 || &data[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}

/// GIF: logical screen width/height at bytes 6-9 (little-endian).
fn gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 10 {
        return None;
    }
    let width = u16::from_le_bytes([data[6], data[7]]) as u32;
    let height = u16::from_le_bytes([data[8], data[9]]) as u32;
    Some((width, height))
}

/// DIB header sizes: OS/2 core, BITMAPINFOHEADER and its V2 to V5 extensions.
const BMP_HEADER_SIZES: &[u32] = &[12, 40, 52, 56, 108, 124];

/// Size of the file header that precedes the DIB header.
const BMP_FILE_HEADER_LEN: u32 = 14;

/// BMP: BITMAPINFOHEADER width/height at bytes 18-25 (signed, little-endian).
/// A negative height marks a top-down bitmap.
///
/// Anything else starting with `BM` is rejected unless the DIB header size is
/// a known one, the plane count is 1 and the file size field covers both
/// headers.
fn bmp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 18 {
        return None;
    }
    let file_size = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
    let header_size = u32::from_le_bytes([data[14], data[15], data[16], data[17]]);
    if !BMP_HEADER_SIZES.contains(&header_size)
        || file_size < BMP_FILE_HEADER_LEN + header_size
    {
        return None;
    }

    if header_size == 12 {
        // OS/2 BITMAPCOREHEADER uses 16-bit fields
        if data.len() < 24 || u16::from_le_bytes([data[22], data[23]]) != 1 {
            return None;
        }
        let width = u16::from_le_bytes([data[18], data[19]]) as u32;
        let height = u16::from_le_bytes([data[20], data[21]]) as u32;
        return Some((width, height));
    }

    if data.len() < 28 || u16::from_le_bytes([data[26], data[27]]) != 1 {
        return None;
    }
    let width = i32::from_le_bytes([data[18], data[19], data[20], data[21]]);
    let height = i32::from_le_bytes([data[22], data[23], data[24], data[25]]);
    Some((width.unsigned_abs(), height.unsigned_abs()))
}

/// Extract dimensions from JPEG data by parsing SOF markers.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // Fill bytes and standalone markers carry no length
        if marker == 0xFF {
            i += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }

        // SOF markers (Start of Frame) - various encoding types
        if matches!(
            marker,
            0xC0 | 0xC1
                | 0xC2
                | 0xC3
                | 0xC5
                | 0xC6
                | 0xC7
                | 0xC9
                | 0xCA
                | 0xCB
                | 0xCD
                | 0xCE
                | 0xCF
        ) && i + 9 < data.len()
        {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            return None;
        }
        i += 2 + length;
    }
    None
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal image headers for tests.

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 2, 0, 0, 0]);
        data
    }

    pub fn jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // APP0 segment to skip over
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
        // SOF0
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    pub fn gif(width: u16, height: u16) -> Vec<u8> {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[0, 0, 0]);
        data
    }

    pub fn bmp(width: i32, height: i32) -> Vec<u8> {
        let mut data = b"BM".to_vec();
        // File size covering both headers, reserved words, pixel offset
        data.extend_from_slice(&54u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&54u32.to_le_bytes());
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[1, 0, 24, 0]);
        data
    }

    /// OS/2 bitmap with a 12-byte core header.
    pub fn os2_bmp(width: u16, height: u16) -> Vec<u8> {
        let mut data = b"BM".to_vec();
        data.extend_from_slice(&26u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&26u32.to_le_bytes());
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[1, 0, 24, 0]);
        data
    }
}
