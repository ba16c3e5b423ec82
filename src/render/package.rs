//! Package document (`content.opf`) generation.

use std::fmt::Write as _;

use chrono::Utc;

use super::{XML_DECLARATION, escape_xml};
use crate::error::{Error, Result};
use crate::model::{ManifestEntry, Metadata, PageItem};

/// Generate the package document from metadata, manifest and spine.
///
/// Manifest items and spine itemrefs are emitted in the order given. Fails with
/// [`Error::Validation`] if a required metadata field is blank.
pub fn render_package_document<'a>(
    metadata: &Metadata,
    manifest: &[ManifestEntry],
    spine: impl IntoIterator<Item = &'a PageItem>,
) -> Result<String> {
    let missing = metadata.missing_fields();
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let direction = metadata.direction.as_str();
    let mut opf = String::from(XML_DECLARATION);

    let _ = writeln!(
        opf,
        "<package xmlns=\"http://www.idpf.org/2007/opf\" version=\"3.0\" unique-identifier=\"bookid\" dir=\"{direction}\" prefix=\"rendition: http://www.idpf.org/vocab/rendition/#\">"
    );

    write_metadata(&mut opf, metadata, manifest);

    opf.push_str("  <manifest>\n");
    for entry in manifest {
        let item = entry.item();
        let _ = write!(
            opf,
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"",
            escape_xml(&item.id),
            escape_xml(&item.href),
            escape_xml(&item.media_type)
        );
        if let Some(ref properties) = item.properties {
            let _ = write!(opf, " properties=\"{}\"", escape_xml(properties));
        }
        opf.push_str("/>\n");
    }
    opf.push_str("  </manifest>\n");

    let _ = writeln!(opf, "  <spine page-progression-direction=\"{direction}\">");
    for page in spine {
        let _ = write!(opf, "    <itemref idref=\"{}\"", escape_xml(&page.item.id));
        if let Some(spread) = page.spread {
            let _ = write!(opf, " properties=\"{}\"", spread.property());
        }
        opf.push_str("/>\n");
    }
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    Ok(opf)
}

fn write_metadata(opf: &mut String, metadata: &Metadata, manifest: &[ManifestEntry]) {
    opf.push_str("  <metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n");
    opf.push_str("    <dc:type>text</dc:type>\n");

    let _ = writeln!(
        opf,
        "    <dc:identifier id=\"bookid\">{}</dc:identifier>",
        escape_xml(&metadata.identifier)
    );
    push_element(opf, "dc:title", &metadata.title);
    push_element(opf, "dc:creator", &metadata.author);
    push_element(opf, "dc:publisher", &metadata.publisher);
    let _ = writeln!(
        opf,
        "    <dc:date>{}</dc:date>",
        metadata.publishing_date.format("%Y-%m-%d")
    );
    push_element(opf, "dc:language", &metadata.language);

    // dcterms:modified (required for EPUB3)
    let modified = metadata.modified.unwrap_or_else(Utc::now);
    let _ = writeln!(
        opf,
        "    <meta property=\"dcterms:modified\">{}</meta>",
        modified.format("%Y-%m-%dT%H:%M:%SZ")
    );

    // Fixed layout rendition properties
    opf.push_str("    <meta property=\"rendition:layout\">pre-paginated</meta>\n");
    opf.push_str("    <meta property=\"rendition:orientation\">auto</meta>\n");
    opf.push_str("    <meta property=\"rendition:spread\">landscape</meta>\n");

    push_optional(opf, "dc:description", metadata.description.as_deref());
    for tag in &metadata.tags {
        push_element(opf, "dc:subject", tag);
    }
    for (key, value) in &metadata.properties {
        let _ = writeln!(
            opf,
            "    <meta property=\"{}\">{}</meta>",
            escape_xml(key),
            escape_xml(value)
        );
    }
    push_optional(opf, "dc:source", metadata.source.as_deref());
    push_optional(opf, "dc:relation", metadata.relation.as_deref());
    push_optional(opf, "dc:rights", metadata.copyright.as_deref());

    // EPUB 2 style cover hint, still read by many devices
    let cover = manifest.iter().filter_map(ManifestEntry::as_image).find(|image| {
        image
            .item
            .properties
            .as_deref()
            .is_some_and(|p| p.split_whitespace().any(|p| p == "cover-image"))
    });
    if let Some(cover) = cover {
        let _ = writeln!(
            opf,
            "    <meta name=\"cover\" content=\"{}\"/>",
            escape_xml(&cover.item.id)
        );
    }

    opf.push_str("  </metadata>\n");
}

fn push_element(opf: &mut String, name: &str, value: &str) {
    let _ = writeln!(opf, "    <{name}>{}</{name}>", escape_xml(value));
}

/// Blank values are left out entirely.
fn push_optional(opf: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        push_element(opf, name, value);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::model::{ManifestItem, ReadingDirection, SpreadSide};

    fn metadata() -> Metadata {
        let mut meta = Metadata::new("Test book")
            .with_author("John Smith")
            .with_publisher("Example Press")
            .with_identifier("urn:uuid:1234")
            .with_tag("Beta")
            .with_tag("Alpha");
        meta.publishing_date = NaiveDate::from_ymd_opt(1208, 12, 23).unwrap();
        meta.modified = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        meta
    }

    #[test]
    fn test_golden_output() {
        let manifest = vec![
            ManifestEntry::from(
                ManifestItem::new("nav", "nav.xhtml", "application/xhtml+xml")
                    .with_properties("nav"),
            ),
            ManifestEntry::from(PageItem::new("p_a", "a.xhtml")),
        ];
        let spine = [PageItem::new("p_a", "a.xhtml").with_spread(SpreadSide::Left)];

        let opf = render_package_document(&metadata(), &manifest, &spine).unwrap();
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="bookid" dir="ltr" prefix="rendition: http://www.idpf.org/vocab/rendition/#">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:type>text</dc:type>
    <dc:identifier id="bookid">urn:uuid:1234</dc:identifier>
    <dc:title>Test book</dc:title>
    <dc:creator>John Smith</dc:creator>
    <dc:publisher>Example Press</dc:publisher>
    <dc:date>1208-12-23</dc:date>
    <dc:language>en-us</dc:language>
    <meta property="dcterms:modified">2024-01-02T03:04:05Z</meta>
    <meta property="rendition:layout">pre-paginated</meta>
    <meta property="rendition:orientation">auto</meta>
    <meta property="rendition:spread">landscape</meta>
    <dc:subject>Alpha</dc:subject>
    <dc:subject>Beta</dc:subject>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="p_a" href="a.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine page-progression-direction="ltr">
    <itemref idref="p_a" properties="page-spread-left"/>
  </spine>
</package>
"#;
        assert_eq!(opf, expected);
    }

    #[test]
    fn test_optional_fields_and_escaping() {
        let mut meta = metadata()
            .with_property("schema:accessMode", "visual")
            .with_direction(ReadingDirection::RightToLeft);
        meta.title = "Tom & Jerry".into();
        meta.description = Some("A <b>story</b>".into());
        meta.source = Some("   ".into());
        meta.copyright = Some("(c) Someone".into());

        let opf = render_package_document(&meta, &[], []).unwrap();
        assert!(opf.contains("<dc:title>Tom &amp; Jerry</dc:title>"));
        assert!(opf.contains("<dc:description>A &lt;b&gt;story&lt;/b&gt;</dc:description>"));
        assert!(opf.contains("<meta property=\"schema:accessMode\">visual</meta>"));
        assert!(opf.contains("<dc:rights>(c) Someone</dc:rights>"));
        assert!(!opf.contains("dc:source"));
        assert!(!opf.contains("dc:relation"));
        assert!(opf.contains("dir=\"rtl\""));
        assert!(opf.contains("<spine page-progression-direction=\"rtl\">"));
    }

    #[test]
    fn test_invalid_metadata() {
        let meta = Metadata::new("Only a title");
        let err = render_package_document(&meta, &[], []).unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert!(msg.contains("author"));
                assert!(msg.contains("publisher"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }
}
