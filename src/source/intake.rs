//! Intake of raw primitives.
//!
//! Extractors occasionally emit primitives that cannot take part in the
//! geometry passes. They are skipped with a reason instead of failing the
//! page, and the reasons are tallied per document.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Element, PageStream};

/// Why a raw primitive was not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// A coordinate or extent is not a finite number
    MalformedGeometry,
    /// A text span with no characters
    EmptyText,
    /// An inline image whose bytes duplicate an XObject image
    DuplicateImage,
    /// An image that only appears as mask content
    MaskOnlyImage,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedGeometry => write!(f, "malformed geometry"),
            SkipReason::EmptyText => write!(f, "empty text"),
            SkipReason::DuplicateImage => write!(f, "duplicate image"),
            SkipReason::MaskOnlyImage => write!(f, "mask-only image"),
        }
    }
}

/// Result of taking in one raw primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Kept(T),
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    pub fn is_kept(&self) -> bool {
        matches!(self, Outcome::Kept(_))
    }

    pub fn kept(self) -> Option<T> {
        match self {
            Outcome::Kept(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Kept(value) => Outcome::Kept(f(value)),
            Outcome::Skipped(reason) => Outcome::Skipped(reason),
        }
    }
}

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn clamp_extent(extent: &mut f64) {
    if *extent < 0.0 {
        *extent = 0.0;
    }
}

/// Check an element's geometry.
///
/// Non-finite coordinates skip the element; negative extents are clamped to
/// zero so the element survives but never occludes anything. Texts with an
/// empty string are skipped whatever their extent.
pub fn validate_element(element: Element) -> Outcome<Element> {
    match element {
        Element::Text(mut text) => {
            if !finite(&[text.left, text.top, text.width, text.height, text.font_size]) {
                return Outcome::Skipped(SkipReason::MalformedGeometry);
            }
            if text.text.is_empty() {
                return Outcome::Skipped(SkipReason::EmptyText);
            }
            clamp_extent(&mut text.width);
            clamp_extent(&mut text.height);
            Outcome::Kept(Element::Text(text))
        }
        Element::Image(image) => {
            if !finite(&[image.left, image.top]) {
                return Outcome::Skipped(SkipReason::MalformedGeometry);
            }
            Outcome::Kept(Element::Image(image))
        }
        Element::Rect(mut rect) => {
            if !finite(&[rect.left, rect.top, rect.width, rect.height]) {
                return Outcome::Skipped(SkipReason::MalformedGeometry);
            }
            clamp_extent(&mut rect.width);
            clamp_extent(&mut rect.height);
            Outcome::Kept(Element::Rect(rect))
        }
        Element::Path(mut path) => {
            if !finite(&[path.left, path.top, path.width, path.height]) {
                return Outcome::Skipped(SkipReason::MalformedGeometry);
            }
            clamp_extent(&mut path.width);
            clamp_extent(&mut path.height);
            Outcome::Kept(Element::Path(path))
        }
        Element::Line(line) => {
            if !finite(&[line.start.x, line.start.y, line.end.x, line.end.y]) {
                return Outcome::Skipped(SkipReason::MalformedGeometry);
            }
            Outcome::Kept(Element::Line(line))
        }
    }
}

/// Kept and skipped counts for a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeReport {
    pub kept: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl IntakeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `outcome` and hand back the kept value.
    pub fn record<T>(&mut self, outcome: Outcome<T>) -> Option<T> {
        match outcome {
            Outcome::Kept(value) => {
                self.kept += 1;
                Some(value)
            }
            Outcome::Skipped(reason) => {
                *self.skipped.entry(reason).or_insert(0) += 1;
                None
            }
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: IntakeReport) {
        self.kept += other.kept;
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_insert(0) += count;
        }
    }

    /// Log a summary; skips are warnings.
    pub fn log(&self, document: &str) {
        if self.skipped.is_empty() {
            log::debug!("{}: took in {} primitive(s)", document, self.kept);
            return;
        }
        let details: Vec<String> = self
            .skipped
            .iter()
            .map(|(reason, count)| format!("{} {}", count, reason))
            .collect();
        log::warn!(
            "{}: took in {} primitive(s), skipped {}",
            document,
            self.kept,
            details.join(", ")
        );
    }
}

/// Validate every element of a stream, dropping the ones that fail.
pub fn validate_stream(stream: PageStream, report: &mut IntakeReport) -> PageStream {
    let PageStream {
        number,
        size,
        items,
    } = stream;
    let items = items
        .into_iter()
        .filter_map(|item| report.record(validate_element(item)))
        .collect();
    PageStream::new(number, size, items)
}
