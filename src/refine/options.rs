//! Refinement thresholds and configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Thresholds used by the refinement passes.
///
/// Coverage thresholds are fractions of the occludee's own area; tolerances
/// are in page units. Every field can be overridden from a partial JSON
/// document, missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Coverage of a text by an image that counts towards a background wash
    pub multi_text_coverage: f64,

    /// Number of covered texts at which an image is treated as a wash
    pub min_covered_texts: usize,

    /// Coverage at which a text is hidden behind an image
    pub text_coverage: f64,

    /// Coverage at which an image is hidden behind a portrait image
    pub portrait_coverage: f64,

    /// Distance from the page size at which a portrait image is the page itself
    pub page_match_tolerance: f64,

    /// Coverage at which a line is hidden behind an image
    pub line_coverage: f64,

    /// Coverage used by the generic covered-by-images filter
    pub item_coverage: f64,

    /// Distance from the page size at which a rect is promoted as background
    pub background_tolerance: f64,

    /// Rects strictly thinner than this may be decorations
    pub hairline_height: f64,

    /// Slack below a text's bottom edge still accepted for an underline
    pub underline_margin: f64,

    /// Distance from a text's vertical center accepted for a strikethrough
    pub linethrough_margin: f64,
}

impl RefineOptions {
    /// Create new refine options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file; absent keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn with_multi_text_coverage(mut self, ratio: f64, min_texts: usize) -> Self {
        self.multi_text_coverage = ratio;
        self.min_covered_texts = min_texts;
        self
    }

    pub fn with_text_coverage(mut self, ratio: f64) -> Self {
        self.text_coverage = ratio;
        self
    }

    pub fn with_portrait_coverage(mut self, ratio: f64) -> Self {
        self.portrait_coverage = ratio;
        self
    }

    pub fn with_page_match_tolerance(mut self, tolerance: f64) -> Self {
        self.page_match_tolerance = tolerance;
        self
    }

    pub fn with_line_coverage(mut self, ratio: f64) -> Self {
        self.line_coverage = ratio;
        self
    }

    pub fn with_item_coverage(mut self, ratio: f64) -> Self {
        self.item_coverage = ratio;
        self
    }

    pub fn with_background_tolerance(mut self, tolerance: f64) -> Self {
        self.background_tolerance = tolerance;
        self
    }

    /// Set the decoration thresholds.
    pub fn with_decoration(mut self, hairline: f64, underline: f64, linethrough: f64) -> Self {
        self.hairline_height = hairline;
        self.underline_margin = underline;
        self.linethrough_margin = linethrough;
        self
    }
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            multi_text_coverage: 0.8,
            min_covered_texts: 2,
            text_coverage: 0.6,
            portrait_coverage: 0.4,
            page_match_tolerance: 2.0,
            line_coverage: 0.8,
            item_coverage: 0.8,
            background_tolerance: 20.0,
            hairline_height: 1.0,
            underline_margin: 0.5,
            linethrough_margin: 1.0,
        }
    }
}

/// Options for reconciling a whole document.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Per-page refinement thresholds
    pub refine: RefineOptions,

    /// Whether to refine pages in parallel
    pub parallel: bool,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refine(mut self, refine: RefineOptions) -> Self {
        self.refine = refine;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            refine: RefineOptions::default(),
            parallel: true,
        }
    }
}
