//! Page image collection.
//!
//! Turns a page's raw image assets into stored `image` elements. An image
//! inlined into the page rendering is often the same bitmap as an XObject
//! image; such inline copies are dropped by comparing MD5 digests of the
//! encoded bytes.

use std::collections::{HashMap, HashSet};

use md5::{Digest, Md5};
use serde_json::Value;

use crate::error::Result;
use crate::model::{Element, ImageAsset, ImageElement, ImageOrigin, PageImageAssets, PageImages};
use crate::source::{IntakeReport, Outcome, SkipReason};
use crate::storage::StorageSink;

/// Lowercase hex MD5 digest of `data`.
pub fn image_hash(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}

/// Accumulator for [`collect_page_images`].
#[derive(Debug, Default)]
struct ImageFold {
    inline: Vec<Element>,
    xref: Vec<Element>,
    /// Storage references by digest, so a bitmap placed twice is written once
    stored: HashMap<String, String>,
    report: IntakeReport,
}

/// Decide whether an asset is kept, given the XObject digests of its page.
fn admit(asset: &ImageAsset, hash: &str, xref_hashes: &HashSet<String>) -> Outcome<()> {
    if asset.mask_only {
        return Outcome::Skipped(SkipReason::MaskOnlyImage);
    }
    if asset.origin == ImageOrigin::Inline && xref_hashes.contains(hash) {
        return Outcome::Skipped(SkipReason::DuplicateImage);
    }
    if !asset.left.is_finite() || !asset.top.is_finite() {
        return Outcome::Skipped(SkipReason::MalformedGeometry);
    }
    Outcome::Kept(())
}

fn image_element(asset: &ImageAsset, url: String) -> ImageElement {
    let mut element = ImageElement::new(url, asset.left, asset.top, asset.width, asset.height);
    element.transform = asset.transform.clone();
    if asset.origin == ImageOrigin::Xref {
        element = element.with_masked(asset.masked);
        if let Some(xref) = asset.xref {
            element
                .metadata
                .insert("xref".to_string(), Value::from(xref));
        }
    }
    element
}

/// Store a page's images and build its portrait and fallback lists.
///
/// Portrait order is inline images first, then XObject images, each in
/// backend order. Fallback images are passed through untouched.
pub fn collect_page_images<S>(
    page: PageImageAssets,
    storage: &S,
) -> Result<(PageImages, IntakeReport)>
where
    S: StorageSink + ?Sized,
{
    let PageImageAssets { assets, fallback } = page;

    let xref_hashes: HashSet<String> = assets
        .iter()
        .filter(|a| a.origin == ImageOrigin::Xref)
        .map(|a| image_hash(&a.data))
        .collect();

    let fold = assets
        .iter()
        .try_fold(ImageFold::default(), |mut fold, asset| -> Result<ImageFold> {
            let hash = image_hash(&asset.data);
            if fold.report.record(admit(asset, &hash, &xref_hashes)).is_none() {
                return Ok(fold);
            }

            let url = match fold.stored.get(&hash).cloned() {
                Some(url) => url,
                None => {
                    let path = format!("images/{}.{}", hash, asset.extension());
                    let url = storage.put_bytes(&asset.data, &path, asset.content_type())?;
                    fold.stored.insert(hash, url.clone());
                    url
                }
            };

            let element: Element = image_element(asset, url).into();
            match asset.origin {
                ImageOrigin::Inline => fold.inline.push(element),
                ImageOrigin::Xref => fold.xref.push(element),
            }
            Ok(fold)
        })?;

    let ImageFold {
        mut inline,
        xref,
        report,
        ..
    } = fold;
    inline.extend(xref);

    Ok((PageImages::new(inline, fallback), report))
}
