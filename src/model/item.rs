use crate::image::ImageFormat;

/// Media type of every XHTML content document.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// A file declared in the package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    /// Path relative to the content root.
    pub href: String,
    pub media_type: String,
    /// Space-separated property tags (`cover-image`, `nav`, ...).
    pub properties: Option<String>,
}

impl ManifestItem {
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }
}

/// An ingested image stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub item: ManifestItem,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl ImageItem {
    /// Wider than tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Which side of a two-page spread a page occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadSide {
    Left,
    Right,
}

impl SpreadSide {
    /// Spine `itemref` property value.
    pub fn property(self) -> &'static str {
        match self {
            SpreadSide::Left => "page-spread-left",
            SpreadSide::Right => "page-spread-right",
        }
    }
}

/// An XHTML page document that is part of the spine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    pub item: ManifestItem,
    pub spread: Option<SpreadSide>,
    nav_label: Option<String>,
}

impl PageItem {
    pub fn new(id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            item: ManifestItem::new(id, href, XHTML_MEDIA_TYPE),
            spread: None,
            nav_label: None,
        }
    }

    /// Attach a navigation label. Blank labels are ignored.
    pub fn with_nav_label(mut self, label: Option<&str>) -> Self {
        self.nav_label = label
            .filter(|label| !label.trim().is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_spread(mut self, spread: SpreadSide) -> Self {
        self.spread = Some(spread);
        self
    }

    /// Label shown in the table of contents, if this page has one.
    pub fn nav_label(&self) -> Option<&str> {
        self.nav_label.as_deref()
    }

    /// Give an unlabeled page a table of contents entry.
    ///
    /// Returns `false` and leaves the page untouched if it is already labeled.
    pub fn promote_to_labeled(&mut self, label: impl Into<String>) -> bool {
        if self.nav_label.is_some() {
            return false;
        }
        self.nav_label = Some(label.into());
        true
    }
}

/// Any entry in the package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// Static assets: stylesheet, navigation document.
    Plain(ManifestItem),
    Image(ImageItem),
    Page(PageItem),
}

impl ManifestEntry {
    pub fn item(&self) -> &ManifestItem {
        match self {
            ManifestEntry::Plain(item) => item,
            ManifestEntry::Image(image) => &image.item,
            ManifestEntry::Page(page) => &page.item,
        }
    }

    pub fn as_image(&self) -> Option<&ImageItem> {
        match self {
            ManifestEntry::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_page(&self) -> Option<&PageItem> {
        match self {
            ManifestEntry::Page(page) => Some(page),
            _ => None,
        }
    }

    pub(crate) fn as_page_mut(&mut self) -> Option<&mut PageItem> {
        match self {
            ManifestEntry::Page(page) => Some(page),
            _ => None,
        }
    }
}

impl From<ManifestItem> for ManifestEntry {
    fn from(item: ManifestItem) -> Self {
        ManifestEntry::Plain(item)
    }
}

impl From<ImageItem> for ManifestEntry {
    fn from(image: ImageItem) -> Self {
        ManifestEntry::Image(image)
    }
}

impl From<PageItem> for ManifestEntry {
    fn from(page: PageItem) -> Self {
        ManifestEntry::Page(page)
    }
}
