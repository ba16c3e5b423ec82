//! XML and XHTML rendering for the package, navigation and page documents.
//!
//! Everything here is a pure function of its inputs; archive layout constants
//! live here too so paths stay consistent between documents.

mod nav;
mod package;
mod page;

pub use nav::render_navigation_document;
pub use package::render_package_document;
pub use page::{PageView, render_page_document};

use std::borrow::Cow;

/// Directory inside the archive holding all book content.
pub const CONTENT_ROOT: &str = "OEBPS/";

pub const MIMETYPE_ENTRY: &str = "mimetype";
pub const MIMETYPE: &[u8] = b"application/epub+zip";

pub const CONTAINER_ENTRY: &str = "META-INF/container.xml";
pub const PACKAGE_ENTRY: &str = "OEBPS/content.opf";

/// Manifest id and href of the navigation document.
pub const NAV_ID: &str = "nav";
pub const NAV_HREF: &str = "nav.xhtml";

/// Manifest id and href of the shared stylesheet.
pub const STYLESHEET_ID: &str = "css";
pub const STYLESHEET_HREF: &str = "style.css";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Container.xml template.
pub const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Stylesheet shared by every page document.
pub const STYLESHEET: &str = "@page {
  margin: 0;
}

html,
body {
  margin: 0;
  padding: 0;
}

.page {
  position: relative;
  overflow: hidden;
  margin: 0;
  padding: 0;
}

.page img {
  position: absolute;
  top: 0;
  display: block;
  margin: 0;
  border: 0;
}
";

/// Escape XML special characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
        assert!(matches!(escape_xml("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_container_points_at_package() {
        let xml = std::str::from_utf8(CONTAINER_XML).unwrap();
        assert!(xml.contains(&format!("full-path=\"{PACKAGE_ENTRY}\"")));
    }
}
