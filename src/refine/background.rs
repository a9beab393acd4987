//! Full-page background rectangles.
//!
//! Two rules with different strictness apply. An opaque white rect with
//! exactly the page's size is a rasterizer artifact and is removed. Any rect
//! within `background_tolerance` of the page size is a background and is
//! painted first. The rules are independent: a near-match is moved, never
//! removed.

use super::RefineOptions;
use crate::geometry::matches_size;
use crate::model::{Element, PageSize};

/// Whether `element` is a white rect exactly the size of the page.
fn is_exact_page_rect(element: &Element, page: &PageSize) -> bool {
    element.as_rect().is_some_and(|rect| {
        rect.is_white_filled() && rect.width == page.width && rect.height == page.height
    })
}

/// Remove opaque white rects that exactly match the page size.
///
/// A missing or unusable page size makes this a no-op.
pub fn remove_full_page_rects(items: Vec<Element>, page: Option<PageSize>) -> Vec<Element> {
    let Some(page) = page.filter(PageSize::is_usable) else {
        return items;
    };

    let before = items.len();
    let kept: Vec<Element> = items
        .into_iter()
        .filter(|item| !is_exact_page_rect(item, &page))
        .collect();

    log::debug!(
        "remove_full_page_rects: dropped {} rect(s)",
        before - kept.len()
    );
    kept
}

/// Move rects that approximately cover the page to the front.
///
/// This is a stable two-way partition: promoted rects keep their relative
/// order, and so does everything else. A missing or unusable page size
/// makes this a no-op.
pub fn promote_background_rects(
    items: Vec<Element>,
    page: Option<PageSize>,
    options: &RefineOptions,
) -> Vec<Element> {
    let Some(page) = page.filter(PageSize::is_usable) else {
        return items;
    };

    let (mut backgrounds, others): (Vec<Element>, Vec<Element>) =
        items.into_iter().partition(|item| {
            item.as_rect().is_some_and(|rect| {
                matches_size(
                    rect.width,
                    rect.height,
                    page.width,
                    page.height,
                    options.background_tolerance,
                )
            })
        });

    log::debug!(
        "promote_background_rects: moved {} rect(s) to the front",
        backgrounds.len()
    );

    backgrounds.extend(others);
    backgrounds
}
