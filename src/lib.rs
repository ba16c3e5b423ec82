//! # comicpub
//!
//! Build fixed-layout EPUB 3 books from sequences of images, the way comics
//! and manga are packaged.
//!
//! ## Features
//!
//! - One page per portrait image, two-page spreads for landscape images
//! - Left-to-right and right-to-left reading order
//! - Incremental building: each image is written as soon as it is added
//! - Pluggable archive sinks and image decoders
//!
//! ## Quick Start
//!
//! ```
//! use comicpub::{BookBuilder, Metadata};
//! use comicpub::archive::MemorySink;
//!
//! # fn png(width: u32, height: u32) -> Vec<u8> {
//! #     let mut data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
//! #     data.extend_from_slice(&width.to_be_bytes());
//! #     data.extend_from_slice(&height.to_be_bytes());
//! #     data
//! # }
//! let mut builder = BookBuilder::new(MemorySink::new()).with_metadata(
//!     Metadata::new("My Comic")
//!         .with_author("Author Name")
//!         .with_publisher("Publisher"),
//! );
//!
//! builder.add_page(&png(800, 1200)[..], Some("Chapter 1"))?;
//! builder.add_page(&png(1600, 1200)[..], None)?; // becomes a spread
//! builder.finalize()?;
//!
//! let sink = builder.into_sink();
//! assert!(sink.text("OEBPS/content.opf").is_some());
//! # Ok::<(), comicpub::Error>(())
//! ```

pub mod archive;
pub mod builder;
pub mod error;
pub mod image;
pub mod layout;
pub mod model;
pub mod render;

pub use crate::image::{DecodedImage, HeaderDecoder, ImageDecoder, ImageFormat};
pub use builder::{BookBuilder, BuilderConfig, CoverOptions};
pub use error::{Error, Result};
pub use model::{ManifestEntry, Metadata, PageItem, ReadingDirection};
