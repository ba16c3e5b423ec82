//! Turning raw image input into stored image items.

use std::io::Read;

use tracing::debug;

use super::{DecodedImage, ImageDecoder};
use crate::archive::{self, ArchiveSink};
use crate::error::{Error, Result};
use crate::model::{ImageItem, ManifestItem};
use crate::render::CONTENT_ROOT;

/// What an image is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Cover,
    Page,
}

/// An image that decoded and validated successfully but is not stored yet.
#[derive(Debug)]
pub struct IngestedImage {
    pub decoded: DecodedImage,
    pub role: ImageRole,
    data: Vec<u8>,
}

/// Read `reader` to completion and identify the image.
///
/// With `check_aspect_ratio`, a cover wider than 3:4 is rejected. Pages are
/// never checked. Nothing is written anywhere until [`IngestedImage::store`].
pub fn ingest<R: Read, D: ImageDecoder>(
    mut reader: R,
    role: ImageRole,
    check_aspect_ratio: bool,
    decoder: &D,
) -> Result<IngestedImage> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let decoded = decoder
        .decode(&data)
        .ok_or_else(|| Error::Format("image data is of invalid or unrecognized format".into()))?;
    if decoded.width == 0 || decoded.height == 0 {
        return Err(Error::Format(format!(
            "image has empty dimensions {}x{}",
            decoded.width, decoded.height
        )));
    }

    if role == ImageRole::Cover
        && check_aspect_ratio
        && u64::from(decoded.width) * 4 > u64::from(decoded.height) * 3
    {
        return Err(Error::Format(format!(
            "cover is too wide ({}x{}), aspect ratio must not exceed 3:4",
            decoded.width, decoded.height
        )));
    }

    Ok(IngestedImage {
        decoded,
        role,
        data,
    })
}

impl IngestedImage {
    /// Raw bytes exactly as read.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Write the raw bytes to `<content root><stem><ext>` and describe them.
    pub fn store<S: ArchiveSink>(self, sink: &mut S, stem: &str) -> Result<ImageItem> {
        let format = self.decoded.format;
        let mut item = ManifestItem::new(
            format!("i_{stem}"),
            format!("{stem}{}", format.extension()),
            format.mime_type(),
        );
        if self.role == ImageRole::Cover {
            item = item.with_properties("cover-image");
        }

        let path = format!("{CONTENT_ROOT}{}", item.href);
        archive::write_entry(sink, &path, format.compression(), &self.data)?;
        debug!(
            path = %path,
            width = self.decoded.width,
            height = self.decoded.height,
            "stored image"
        );

        Ok(ImageItem {
            item,
            width: self.decoded.width,
            height: self.decoded.height,
            format,
        })
    }
}
