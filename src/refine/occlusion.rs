//! Occlusion filters.
//!
//! Each filter takes ownership of a page's element list and returns the
//! retained elements in their original relative order. Elements without
//! area never occlude and are never occluded.

use super::RefineOptions;
use crate::geometry::{area, coverage_ratio, matches_size, Bounds};
use crate::model::{Element, PageSize};

/// Whether any occluder hides at least `threshold` of `target`.
fn is_covered(target: &Bounds, occluders: &[Bounds], threshold: f64) -> bool {
    if area(target) <= 0.0 {
        return false;
    }
    occluders
        .iter()
        .any(|occluder| area(occluder) > 0.0 && coverage_ratio(target, occluder) >= threshold)
}

/// Bounds of every image in `items`.
pub fn image_bounds(items: &[Element]) -> Vec<Bounds> {
    items
        .iter()
        .filter(|e| e.is_image())
        .map(Element::bounds)
        .collect()
}

/// Drop images that hide several texts: such an image is a background wash
/// behind the text rather than content in front of it.
///
/// A text counts when at least `multi_text_coverage` of its own area lies
/// under the image. Texts are never removed here.
pub fn remove_images_covering_texts(items: Vec<Element>, options: &RefineOptions) -> Vec<Element> {
    let texts: Vec<Bounds> = items
        .iter()
        .filter(|e| e.is_text())
        .map(Element::bounds)
        .filter(|b| area(b) > 0.0)
        .collect();

    let before = items.len();
    let kept: Vec<Element> = items
        .into_iter()
        .filter(|item| {
            if !item.is_image() {
                return true;
            }
            let image = item.bounds();
            if area(&image) <= 0.0 {
                return true;
            }
            let covered = texts
                .iter()
                .filter(|text| coverage_ratio(text, &image) >= options.multi_text_coverage)
                .take(options.min_covered_texts)
                .count();
            covered < options.min_covered_texts
        })
        .collect();

    log::debug!(
        "remove_images_covering_texts: dropped {} image(s)",
        before - kept.len()
    );
    kept
}

/// Drop texts hidden behind any of the given images.
pub fn remove_covered_texts(
    items: Vec<Element>,
    images: &[Bounds],
    threshold: f64,
) -> Vec<Element> {
    let before = items.len();
    let kept: Vec<Element> = items
        .into_iter()
        .filter(|item| !(item.is_text() && is_covered(&item.bounds(), images, threshold)))
        .collect();

    log::debug!("remove_covered_texts: dropped {} text(s)", before - kept.len());
    kept
}

/// Drop lines whose endpoint box is hidden behind any of the given images.
///
/// Axis-aligned lines have a zero-area box and are always kept.
pub fn remove_covered_lines(
    items: Vec<Element>,
    images: &[Bounds],
    threshold: f64,
) -> Vec<Element> {
    let before = items.len();
    let kept: Vec<Element> = items
        .into_iter()
        .filter(|item| !(item.is_line() && is_covered(&item.bounds(), images, threshold)))
        .collect();

    log::debug!("remove_covered_lines: dropped {} line(s)", before - kept.len());
    kept
}

/// Drop lines, rects, texts and images hidden behind any of the given
/// images by at least `item_coverage`. Paths always pass through.
///
/// The occluder set should not contain the images being filtered, or each
/// of them would hide itself.
pub fn remove_items_covered_by_images(
    items: Vec<Element>,
    images: &[Bounds],
    options: &RefineOptions,
) -> Vec<Element> {
    let before = items.len();
    let kept: Vec<Element> = items
        .into_iter()
        .filter(|item| match item {
            Element::Path(_) => true,
            _ => !is_covered(&item.bounds(), images, options.item_coverage),
        })
        .collect();

    log::debug!(
        "remove_items_covered_by_images: dropped {} element(s)",
        before - kept.len()
    );
    kept
}

/// Drop images largely hidden behind a portrait image.
///
/// A portrait image that is itself page-sized (within
/// `page_match_tolerance`) is the page background and hides nothing.
/// Without a usable page size that exemption cannot be decided, so the
/// filter keeps everything.
pub fn remove_images_covered_by_portraits(
    portraits: &[Element],
    items: Vec<Element>,
    page: Option<PageSize>,
    options: &RefineOptions,
) -> Vec<Element> {
    let Some(page) = page.filter(PageSize::is_usable) else {
        if !portraits.is_empty() {
            log::warn!("No usable page size; keeping images under portrait images");
        }
        return items;
    };

    let occluders: Vec<Bounds> = portraits
        .iter()
        .map(Element::bounds)
        .filter(|b| {
            !matches_size(
                b.width,
                b.height,
                page.width,
                page.height,
                options.page_match_tolerance,
            )
        })
        .collect();

    if occluders.is_empty() {
        return items;
    }

    let before = items.len();
    let kept: Vec<Element> = items
        .into_iter()
        .filter(|item| {
            !(item.is_image() && is_covered(&item.bounds(), &occluders, options.portrait_coverage))
        })
        .collect();

    log::debug!(
        "remove_images_covered_by_portraits: dropped {} image(s)",
        before - kept.len()
    );
    kept
}
