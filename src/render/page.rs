//! Page document generation.

use std::fmt::Write as _;

use super::{STYLESHEET_HREF, XML_DECLARATION, escape_xml};

/// Placement of an image on a fixed-size page canvas.
///
/// The image is always drawn at its native size; `offset_x` shifts it left so
/// that only part of it falls inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView<'a> {
    /// Image path relative to the page document.
    pub image_href: &'a str,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub offset_x: i64,
}

/// Generate a fixed-layout XHTML page showing one image.
pub fn render_page_document(view: &PageView<'_>) -> String {
    let href = escape_xml(view.image_href);
    let mut html = String::from(XML_DECLARATION);
    html.push_str(
        "<!DOCTYPE html>\n<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\">\n<head>\n  <meta charset=\"utf-8\"/>\n",
    );
    let _ = writeln!(
        html,
        "  <meta name=\"viewport\" content=\"width={}, height={}\"/>",
        view.canvas_width, view.canvas_height
    );
    let _ = writeln!(html, "  <title>{href}</title>");
    let _ = writeln!(
        html,
        "  <link rel=\"stylesheet\" type=\"text/css\" href=\"{STYLESHEET_HREF}\"/>"
    );
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(
        html,
        "  <div class=\"page\" style=\"width: {}px; height: {}px;\">",
        view.canvas_width, view.canvas_height
    );
    let _ = writeln!(
        html,
        "    <img src=\"{href}\" alt=\"\" style=\"left: {}px; width: {}px; height: {}px;\"/>",
        view.offset_x, view.image_width, view.image_height
    );
    html.push_str("  </div>\n</body>\n</html>\n");
    html
}
