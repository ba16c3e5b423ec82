//! Content model for a fixed-layout book.
//!
//! This module contains:
//! - Book metadata and reading direction
//! - Manifest entries (plain assets, images, pages)

mod item;
mod metadata;

pub use item::{ImageItem, ManifestEntry, ManifestItem, PageItem, SpreadSide, XHTML_MEDIA_TYPE};
pub use metadata::{Metadata, ReadingDirection};
