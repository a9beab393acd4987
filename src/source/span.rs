//! Conversion of raw text spans into text elements.

use serde::{Deserialize, Serialize};

use super::intake::{IntakeReport, Outcome, SkipReason};
use crate::fonts::FontResolver;
use crate::model::{hex_color, FontStyle, FontWeight, PageSize, PageStream, TextElement};

fn opaque() -> u8 {
    255
}

/// A text span as reported by the text extractor.
///
/// `bbox` is `[x0, y0, x1, y1]` in page space; `size` is the font size and
/// `color` a packed sRGB value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    #[serde(default)]
    pub text: String,
    pub bbox: [f64; 4],
    pub size: f64,
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default = "opaque")]
    pub alpha: u8,
}

impl RawSpan {
    pub fn new(text: impl Into<String>, bbox: [f64; 4], size: f64, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox,
            size,
            font: font.into(),
            color: 0,
            alpha: opaque(),
        }
    }
}

/// All spans of one page, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTextPage {
    pub number: u32,
    #[serde(default)]
    pub size: Option<PageSize>,
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

/// Build a text element from a span and its resolved font.
///
/// The top edge is the baseline minus the font size, so glyphs with
/// descenders do not shift the element upwards.
///
/// A span with empty text is skipped even when its box has area. It never
/// reaches the page, so it does not count towards the covered texts that
/// mark an image as a background wash.
pub fn text_from_span(span: &RawSpan, font: &FontStyle) -> Outcome<TextElement> {
    let [x0, y0, x1, y1] = span.bbox;
    if !span.bbox.iter().all(|v| v.is_finite()) || !span.size.is_finite() {
        return Outcome::Skipped(SkipReason::MalformedGeometry);
    }
    if span.text.is_empty() {
        return Outcome::Skipped(SkipReason::EmptyText);
    }

    Outcome::Kept(TextElement {
        text: span.text.clone(),
        left: x0,
        top: y1 - span.size,
        width: (x1 - x0).max(0.0),
        height: (y1 - y0).max(0.0),
        font_weight: FontWeight::from_font_name(&span.font),
        font_size: span.size,
        font_family: font.full_font_name.clone(),
        font_url: font.font_url.clone(),
        fill: hex_color(span.color),
        opacity: f64::from(span.alpha) / 255.0,
        underline: false,
        linethrough: false,
    })
}

/// Convert every span of every page, resolving fonts as it goes.
pub fn text_streams(
    pages: Vec<RawTextPage>,
    resolver: &FontResolver,
    report: &mut IntakeReport,
) -> Vec<PageStream> {
    pages
        .into_iter()
        .map(|page| {
            let items = page
                .spans
                .iter()
                .filter_map(|span| {
                    let font = resolver.resolve(&span.font);
                    report.record(text_from_span(span, font))
                })
                .map(Into::into)
                .collect();
            PageStream::new(page.number, page.size, items)
        })
        .collect()
}
