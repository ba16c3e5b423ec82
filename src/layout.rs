//! Page layout: how an image becomes one or two fixed-layout pages.
//!
//! Portrait and square images fill a single page. Landscape images are split
//! down the middle into two half-width pages that a reader shows side by side
//! as a spread. The half read first carries the navigation label; the other
//! half never does.

use tracing::debug;

use crate::model::{ImageItem, PageItem, ReadingDirection, SpreadSide};
use crate::render::{PageView, render_page_document};

/// A page item together with its rendered XHTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutPage {
    pub page: PageItem,
    pub document: String,
}

/// Lay out `image` as pages in reading order.
///
/// Page ids and paths derive from `stem`: `p_<stem>` / `<stem>.xhtml` for a
/// single page, with `_L` / `_R` suffixes for the halves of a spread.
pub fn layout_pages(
    image: &ImageItem,
    stem: &str,
    nav_label: Option<&str>,
    direction: ReadingDirection,
) -> Vec<LaidOutPage> {
    if !image.is_landscape() {
        let view = PageView {
            image_href: &image.item.href,
            canvas_width: image.width,
            canvas_height: image.height,
            image_width: image.width,
            image_height: image.height,
            offset_x: 0,
        };
        let page =
            PageItem::new(format!("p_{stem}"), format!("{stem}.xhtml")).with_nav_label(nav_label);
        debug!(page = %page.item.href, "laid out single page");
        return vec![LaidOutPage {
            page,
            document: render_page_document(&view),
        }];
    }

    let (first, second) = match direction {
        ReadingDirection::LeftToRight => (SpreadSide::Left, SpreadSide::Right),
        ReadingDirection::RightToLeft => (SpreadSide::Right, SpreadSide::Left),
    };

    let pages = vec![
        half_page(image, stem, first, nav_label),
        half_page(image, stem, second, None),
    ];
    debug!(
        first = %pages[0].page.item.href,
        second = %pages[1].page.item.href,
        "laid out spread"
    );
    pages
}

fn half_page(
    image: &ImageItem,
    stem: &str,
    side: SpreadSide,
    nav_label: Option<&str>,
) -> LaidOutPage {
    let half = image.width / 2;
    let (suffix, canvas_width, offset_x) = match side {
        SpreadSide::Left => ("L", half, 0),
        SpreadSide::Right => ("R", image.width - half, -i64::from(half)),
    };

    let view = PageView {
        image_href: &image.item.href,
        canvas_width,
        canvas_height: image.height,
        image_width: image.width,
        image_height: image.height,
        offset_x,
    };
    let page = PageItem::new(
        format!("p_{stem}_{suffix}"),
        format!("{stem}_{suffix}.xhtml"),
    )
    .with_nav_label(nav_label)
    .with_spread(side);

    LaidOutPage {
        page,
        document: render_page_document(&view),
    }
}
