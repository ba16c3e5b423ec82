//! Archive sinks that receive the files of a book.
//!
//! The builder only ever creates entries and writes to them; opening and
//! finishing the container is the caller's job.
//!
//! # Example
//!
//! ```no_run
//! use comicpub::archive::{ZipConfig, ZipSink};
//! use std::fs::File;
//!
//! let file = File::create("book.epub")?;
//! let sink = ZipSink::new(file).with_config(ZipConfig { compression_level: Some(9) });
//! // ... hand `sink` to a `BookBuilder`, then take it back with `into_sink()` ...
//! sink.finish()?;
//! # Ok::<(), comicpub::Error>(())
//! ```

use std::io::{Seek, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;

/// How an entry's bytes are stored in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    Deflated,
}

/// Destination for archive entries.
pub trait ArchiveSink {
    /// Writable handle for one entry. The entry ends when the handle is dropped
    /// or the next entry is created.
    type Entry<'a>: Write
    where
        Self: 'a;

    fn create_entry(&mut self, path: &str, compression: Compression) -> Result<Self::Entry<'_>>;
}

/// Configuration for [`ZipSink`].
#[derive(Debug, Clone, Default)]
pub struct ZipConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<i64>,
}

/// Archive sink backed by a ZIP container.
pub struct ZipSink<W: Write + Seek> {
    zip: ZipWriter<W>,
    config: ZipConfig,
}

impl<W: Write + Seek> ZipSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            config: ZipConfig::default(),
        }
    }

    /// Configure the sink with custom settings.
    pub fn with_config(mut self, config: ZipConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the central directory and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }

    fn options(&self, compression: Compression) -> SimpleFileOptions {
        match compression {
            Compression::Stored => {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            }
            Compression::Deflated => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(self.config.compression_level.unwrap_or(6))),
        }
    }
}

impl<W: Write + Seek> ArchiveSink for ZipSink<W> {
    type Entry<'a>
        = &'a mut ZipWriter<W>
    where
        Self: 'a;

    fn create_entry(&mut self, path: &str, compression: Compression) -> Result<Self::Entry<'_>> {
        let options = self.options(compression);
        self.zip.start_file(path, options)?;
        Ok(&mut self.zip)
    }
}

/// One entry captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub path: String,
    pub compression: Compression,
    pub data: Vec<u8>,
}

/// Archive sink that keeps every entry in memory, in creation order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub entries: Vec<MemoryEntry>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry paths in creation order.
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn get(&self, path: &str) -> Option<&MemoryEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Entry content as UTF-8 text.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|e| std::str::from_utf8(&e.data).ok())
    }
}

impl ArchiveSink for MemorySink {
    type Entry<'a> = &'a mut Vec<u8>;

    fn create_entry(&mut self, path: &str, compression: Compression) -> Result<Self::Entry<'_>> {
        self.entries.push(MemoryEntry {
            path: path.to_string(),
            compression,
            data: Vec::new(),
        });
        let last = self.entries.len() - 1;
        Ok(&mut self.entries[last].data)
    }
}

/// Create an entry and write `data` to it in one step.
pub(crate) fn write_entry<S: ArchiveSink>(
    sink: &mut S,
    path: &str,
    compression: Compression,
    data: &[u8],
) -> Result<()> {
    let mut entry = sink.create_entry(path, compression)?;
    entry.write_all(data)?;
    entry.flush()?;
    Ok(())
}
