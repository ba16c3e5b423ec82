//! Incremental book building.
//!
//! A [`BookBuilder`] owns an archive sink and accepts a cover and pages one at
//! a time. Every call writes its files immediately; [`BookBuilder::finalize`]
//! writes the package and navigation documents last.
//!
//! # Example
//!
//! ```no_run
//! use comicpub::{BookBuilder, CoverOptions, Metadata};
//! use comicpub::archive::ZipSink;
//! use std::fs::File;
//!
//! let sink = ZipSink::new(File::create("book.epub")?);
//! let mut builder = BookBuilder::new(sink).with_metadata(
//!     Metadata::new("My Comic")
//!         .with_author("Author Name")
//!         .with_publisher("Publisher"),
//! );
//!
//! builder.set_cover(File::open("cover.jpg")?, CoverOptions::default().insert_as_first_page(true))?;
//! builder.add_page(File::open("001.jpg")?, Some("Chapter 1"))?;
//! builder.add_page(File::open("002.jpg")?, None)?;
//! builder.finalize()?;
//! builder.into_sink().finish()?;
//! # Ok::<(), comicpub::Error>(())
//! ```

use std::io::Read;

use tracing::{debug, warn};

use crate::archive::{self, ArchiveSink, Compression};
use crate::error::{Error, Result};
use crate::image::{HeaderDecoder, ImageDecoder, ImageRole, IngestedImage, ingest};
use crate::layout::{LaidOutPage, layout_pages};
use crate::model::{ImageItem, ManifestEntry, ManifestItem, Metadata, PageItem, XHTML_MEDIA_TYPE};
use crate::render::{
    CONTAINER_ENTRY, CONTAINER_XML, CONTENT_ROOT, MIMETYPE, MIMETYPE_ENTRY, NAV_HREF, NAV_ID,
    PACKAGE_ENTRY, STYLESHEET, STYLESHEET_HREF, STYLESHEET_ID, render_navigation_document,
    render_package_document,
};

/// File name stem of the cover image and its page.
const COVER_STEM: &str = "Cover";

/// Configuration for [`BookBuilder`].
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Table of contents label of a cover inserted as the first page.
    pub cover_label: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            cover_label: "Cover".to_string(),
        }
    }
}

/// How [`BookBuilder::set_cover`] treats the cover image.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverOptions {
    /// Also show the cover as the first page of the book.
    pub insert_as_first_page: bool,
    /// Reject covers wider than 3:4.
    pub check_aspect_ratio: bool,
}

impl CoverOptions {
    pub fn insert_as_first_page(mut self, insert: bool) -> Self {
        self.insert_as_first_page = insert;
        self
    }

    pub fn check_aspect_ratio(mut self, check: bool) -> Self {
        self.check_aspect_ratio = check;
        self
    }
}

/// Builds a fixed-layout EPUB into an [`ArchiveSink`].
///
/// Calls must be made in order: an optional cover and any number of pages,
/// then [`finalize`](Self::finalize). The builder never finishes the sink;
/// take it back with [`into_sink`](Self::into_sink) and close it yourself.
/// Dropping the builder without finalizing leaves the book without its
/// package document.
///
/// No archive path is ever written twice. If the sink fails partway through
/// a call, the entries already written stay in the manifest and their names
/// stay used; pages join the reading order only once all of their entries are
/// written.
pub struct BookBuilder<S: ArchiveSink, D: ImageDecoder = HeaderDecoder> {
    sink: S,
    decoder: D,
    config: BuilderConfig,
    metadata: Metadata,

    manifest: Vec<ManifestEntry>,
    /// Reading order, as indices into `manifest`.
    spine: Vec<usize>,

    /// How many of the static entries have been written.
    static_entries: usize,
    cover_set: bool,
    chapter: u32,
    page: u32,
    package_written: bool,
    finalized: bool,
}

impl<S: ArchiveSink> BookBuilder<S> {
    /// Create a builder that identifies images with [`HeaderDecoder`].
    pub fn new(sink: S) -> Self {
        Self::with_decoder(sink, HeaderDecoder)
    }
}

impl<S: ArchiveSink, D: ImageDecoder> BookBuilder<S, D> {
    /// Create a builder with a specific image decoder.
    pub fn with_decoder(sink: S, decoder: D) -> Self {
        Self {
            sink,
            decoder,
            config: BuilderConfig::default(),
            metadata: Metadata::default(),
            manifest: Vec::new(),
            spine: Vec::new(),
            static_entries: 0,
            cover_set: false,
            chapter: 0,
            page: 0,
            package_written: false,
            finalized: false,
        }
    }

    /// Configure the builder with custom settings.
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Metadata can be changed until the book is finalized. The reading
    /// direction should be set before adding pages, since spreads are laid
    /// out as they are added.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Every manifest entry, in insertion order.
    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    /// Pages in reading order.
    pub fn spine(&self) -> impl Iterator<Item = &PageItem> + '_ {
        self.spine
            .iter()
            .filter_map(|&index| self.manifest[index].as_page())
    }

    pub fn page_count(&self) -> usize {
        self.spine.len()
    }

    pub fn has_cover(&self) -> bool {
        self.cover_set
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Release the sink to the caller.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Set the cover image. May only be called once.
    ///
    /// With `insert_as_first_page`, the cover is also laid out as page(s) at
    /// the very start of the spine, labeled with the configured cover label.
    /// The cover counts as set once its image is stored, even if writing its
    /// pages fails afterwards.
    pub fn set_cover<R: Read>(&mut self, reader: R, options: CoverOptions) -> Result<()> {
        self.ensure_open()?;
        if self.cover_set {
            return Err(Error::InvalidState("cover can only be set once".into()));
        }

        let image = ingest(reader, ImageRole::Cover, options.check_aspect_ratio, &self.decoder)?;
        self.emit_static_assets()?;
        let image = self.store_image(image, COVER_STEM)?;
        self.cover_set = true;
        if options.insert_as_first_page {
            let label = self.config.cover_label.clone();
            let mut spine = self.store_pages(&image, COVER_STEM, Some(&label))?;
            spine.extend_from_slice(&self.spine);
            self.spine = spine;
        }

        debug!(inserted = options.insert_as_first_page, "cover set");
        Ok(())
    }

    /// Append a page.
    ///
    /// A non-empty `nav_label` starts a new chapter and gives the page a table
    /// of contents entry. Landscape images become a two-page spread.
    pub fn add_page<R: Read>(&mut self, reader: R, nav_label: Option<&str>) -> Result<()> {
        self.ensure_open()?;

        let nav_label = nav_label.filter(|label| !label.trim().is_empty());
        let (chapter, page) = if nav_label.is_some() || self.chapter == 0 {
            (self.chapter + 1, 1)
        } else {
            (self.chapter, self.page + 1)
        };

        let image = ingest(reader, ImageRole::Page, false, &self.decoder)?;
        self.emit_static_assets()?;
        // The stem is used from here on, even if a write below fails
        self.chapter = chapter;
        self.page = page;

        let stem = format!("C{chapter:04}P{page:04}");
        let image = self.store_image(image, &stem)?;
        let pages = self.store_pages(&image, &stem, nav_label)?;
        self.spine.extend(pages);
        Ok(())
    }

    /// Write the package and navigation documents.
    ///
    /// Calling this again after it succeeded does nothing. Fails with
    /// [`Error::InvalidState`] if the book has no pages and with
    /// [`Error::Validation`] if required metadata is missing; in both cases the
    /// book stays open. If no page has a label, the first page is labeled
    /// with the book title so the table of contents is never empty.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        if self.spine.is_empty() {
            return Err(Error::InvalidState("cannot build an empty book".into()));
        }

        let package = if self.package_written {
            None
        } else {
            Some(render_package_document(
                &self.metadata,
                &self.manifest,
                self.spine(),
            )?)
        };

        if !self.spine().any(|page| page.nav_label().is_some()) {
            let title = self.metadata.title.clone();
            let first = self.spine[0];
            if let Some(page) = self.manifest[first].as_page_mut() {
                warn!(
                    page = %page.item.href,
                    "no labeled pages, using book title for the first page"
                );
                page.promote_to_labeled(title);
            }
        }
        let navigation = render_navigation_document(self.spine())?;

        if let Some(package) = package {
            archive::write_entry(
                &mut self.sink,
                PACKAGE_ENTRY,
                Compression::Deflated,
                package.as_bytes(),
            )?;
            self.package_written = true;
        }
        archive::write_entry(
            &mut self.sink,
            &format!("{CONTENT_ROOT}{NAV_HREF}"),
            Compression::Deflated,
            navigation.as_bytes(),
        )?;

        self.finalized = true;
        debug!(
            pages = self.spine.len(),
            items = self.manifest.len(),
            "book finalized"
        );
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finalized {
            return Err(Error::InvalidState(
                "unable to add content after the book has been finalized".into(),
            ));
        }
        Ok(())
    }

    /// Write the container boilerplate the first time real content arrives.
    ///
    /// Resumes after the last entry written if an earlier attempt failed.
    fn emit_static_assets(&mut self) -> Result<()> {
        let entries = [
            (MIMETYPE_ENTRY.to_string(), Compression::Stored, MIMETYPE),
            (CONTAINER_ENTRY.to_string(), Compression::Deflated, CONTAINER_XML),
            (
                format!("{CONTENT_ROOT}{STYLESHEET_HREF}"),
                Compression::Deflated,
                STYLESHEET.as_bytes(),
            ),
        ];
        if self.static_entries == entries.len() {
            return Ok(());
        }

        for (path, compression, data) in entries.iter().skip(self.static_entries) {
            archive::write_entry(&mut self.sink, path, *compression, data)?;
            self.static_entries += 1;
        }

        self.manifest.push(
            ManifestItem::new(NAV_ID, NAV_HREF, XHTML_MEDIA_TYPE)
                .with_properties("nav")
                .into(),
        );
        self.manifest
            .push(ManifestItem::new(STYLESHEET_ID, STYLESHEET_HREF, "text/css").into());

        debug!("static assets written");
        Ok(())
    }

    fn store_image(&mut self, image: IngestedImage, stem: &str) -> Result<ImageItem> {
        let image = image.store(&mut self.sink, stem)?;
        self.manifest.push(image.clone().into());
        Ok(image)
    }

    /// Lay out and write the pages for `image`, returning their manifest
    /// indices in reading order.
    fn store_pages(
        &mut self,
        image: &ImageItem,
        stem: &str,
        nav_label: Option<&str>,
    ) -> Result<Vec<usize>> {
        let pages = layout_pages(image, stem, nav_label, self.metadata.direction);
        let mut indices = Vec::with_capacity(pages.len());
        for LaidOutPage { page, document } in pages {
            archive::write_entry(
                &mut self.sink,
                &format!("{CONTENT_ROOT}{}", page.item.href),
                Compression::Deflated,
                document.as_bytes(),
            )?;
            indices.push(self.manifest.len());
            self.manifest.push(page.into());
        }
        Ok(indices)
    }
}
