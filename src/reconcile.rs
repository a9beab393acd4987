//! Page reconciliation.
//!
//! Merges the independent extractor streams by page number and runs the
//! refinement passes over each page in a fixed order. Pages share no state,
//! so they can be refined in parallel; the output is always ordered by page
//! number.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::model::{Element, Page, PageImages, PageSize, PageStream};
use crate::refine::{
    attach_decorations, image_bounds, promote_background_rects, remove_covered_texts,
    remove_full_page_rects, remove_images_covered_by_portraits, remove_images_covering_texts,
    ReconcileOptions, RefineOptions,
};

/// Group every stream's elements by page number.
///
/// Elements are concatenated in stream order and, within a stream, in the
/// order the extractor emitted them. The first declared size for a page
/// wins.
pub fn merge_by_page(streams: Vec<Vec<PageStream>>) -> BTreeMap<u32, Page> {
    let mut merged: BTreeMap<u32, Page> = BTreeMap::new();

    for stream in streams {
        for entry in stream {
            let size = entry.size.filter(|s| {
                let usable = s.is_usable();
                if !usable {
                    log::warn!(
                        "Ignoring unusable size {}x{} for page {}",
                        s.width,
                        s.height,
                        entry.number
                    );
                }
                usable
            });

            let page = merged.entry(entry.number).or_insert_with(|| Page {
                number: entry.number,
                size,
                pdf_items: Vec::new(),
            });

            match (page.size, size) {
                (None, Some(_)) => page.size = size,
                (Some(existing), Some(other)) if existing != other => {
                    log::debug!(
                        "Page {}: keeping size {}x{}, stream reported {}x{}",
                        entry.number,
                        existing.width,
                        existing.height,
                        other.width,
                        other.height
                    );
                }
                _ => {}
            }

            page.pdf_items.extend(entry.items);
        }
    }

    merged
}

/// Run every refinement pass over one page's elements.
///
/// Order: wash images, decorations, texts under images, images under
/// portrait images, exact page rects; then the page is assembled as
/// `portrait + items + fallback`, lines are dropped and background rects are
/// promoted to the front.
///
/// The chain is a fixed point over the item stream: feeding the returned
/// elements back in, without the page's portrait and fallback images and
/// with the same `images`, returns the same elements. The assembled output
/// is not itself an item stream. Once portrait images are items they
/// occlude texts, which they never do on the first run.
pub fn refine_page(
    items: Vec<Element>,
    images: PageImages,
    size: Option<PageSize>,
    options: &RefineOptions,
) -> Vec<Element> {
    let PageImages { portrait, fallback } = images;

    let items = remove_images_covering_texts(items, options);
    let items = attach_decorations(items, options);

    let occluders = image_bounds(&items);
    let items = remove_covered_texts(items, &occluders, options.text_coverage);

    let items = remove_images_covered_by_portraits(&portrait, items, size, options);
    let items = remove_full_page_rects(items, size);

    let mut assembled = Vec::with_capacity(portrait.len() + items.len() + fallback.len());
    assembled.extend(portrait);
    assembled.extend(items);
    assembled.extend(fallback);
    assembled.retain(|item| !item.is_line());

    promote_background_rects(assembled, size, options)
}

/// Refine a merged page in place.
pub fn reconcile_page(mut page: Page, images: PageImages, options: &RefineOptions) -> Page {
    let items = std::mem::take(&mut page.pdf_items);
    let before = items.len() + images.portrait.len() + images.fallback.len();

    page.pdf_items = refine_page(items, images, page.size, options);

    log::debug!(
        "Page {}: {} element(s) in, {} out",
        page.number,
        before,
        page.pdf_items.len()
    );
    page
}

/// Reconcile extractor streams into the final ordered page list.
///
/// `streams` are merged by page number (see [`merge_by_page`]); `images`
/// holds the page-local portrait and fallback images. A page that only
/// appears in `images` is still emitted, without a declared size.
pub fn reconcile(
    streams: Vec<Vec<PageStream>>,
    mut images: BTreeMap<u32, PageImages>,
    options: &ReconcileOptions,
) -> Vec<Page> {
    let mut merged = merge_by_page(streams);

    for &number in images.keys() {
        merged.entry(number).or_insert_with(|| {
            log::warn!("Page {} has images but no extracted primitives", number);
            Page {
                number,
                size: None,
                pdf_items: Vec::new(),
            }
        });
    }

    let work: Vec<(Page, PageImages)> = merged
        .into_values()
        .map(|page| {
            let page_images = images.remove(&page.number).unwrap_or_default();
            (page, page_images)
        })
        .collect();

    let refine = &options.refine;
    if options.parallel {
        work.into_par_iter()
            .map(|(page, page_images)| reconcile_page(page, page_images, refine))
            .collect()
    } else {
        work.into_iter()
            .map(|(page, page_images)| reconcile_page(page, page_images, refine))
            .collect()
    }
}
