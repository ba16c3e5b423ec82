//! Navigation document (`nav.xhtml`) generation.

use std::fmt::Write as _;

use super::{XML_DECLARATION, escape_xml};
use crate::error::{Error, Result};
use crate::model::PageItem;

/// Generate the table of contents from the labeled pages of the spine.
///
/// Unlabeled pages are skipped. Fails with [`Error::EmptyNavigation`] when no
/// page carries a label.
pub fn render_navigation_document<'a>(
    spine: impl IntoIterator<Item = &'a PageItem>,
) -> Result<String> {
    let mut entries = String::new();
    for page in spine {
        if let Some(label) = page.nav_label() {
            let _ = writeln!(
                entries,
                "      <li><a href=\"{}\">{}</a></li>",
                escape_xml(&page.item.href),
                escape_xml(label)
            );
        }
    }
    if entries.is_empty() {
        return Err(Error::EmptyNavigation);
    }

    let mut nav = String::from(XML_DECLARATION);
    nav.push_str(
        r#"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
  <meta charset="utf-8"/>
  <title>Contents</title>
</head>
<body>
  <nav epub:type="toc" id="toc">
    <ol>
"#,
    );
    nav.push_str(&entries);
    nav.push_str("    </ol>\n  </nav>\n</body>\n</html>\n");
    Ok(nav)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_output() {
        let spine = [
            PageItem::new("p_Cover", "Cover.xhtml").with_nav_label(Some("Cover")),
            PageItem::new("p_a_L", "a_L.xhtml").with_nav_label(Some("Chapter <1>")),
            PageItem::new("p_a_R", "a_R.xhtml"),
        ];
        let nav = render_navigation_document(&spine).unwrap();
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
  <meta charset="utf-8"/>
  <title>Contents</title>
</head>
<body>
  <nav epub:type="toc" id="toc">
    <ol>
      <li><a href="Cover.xhtml">Cover</a></li>
      <li><a href="a_L.xhtml">Chapter &lt;1&gt;</a></li>
    </ol>
  </nav>
</body>
</html>
"#;
        assert_eq!(nav, expected);
    }

    #[test]
    fn test_no_labels() {
        let spine = [PageItem::new("p_a", "a.xhtml")];
        assert!(matches!(
            render_navigation_document(&spine),
            Err(Error::EmptyNavigation)
        ));
        assert!(matches!(
            render_navigation_document([]),
            Err(Error::EmptyNavigation)
        ));
    }
}
