//! Page elements.
//!
//! Field declaration order is the JSON key order, and the `type` tag is
//! always emitted first. Downstream consumers diff this output, so fields
//! must not be reordered.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::style::{FillRule, FontWeight, LineCap, LineJoin};
use crate::geometry::{line_to_bounding_box, Bounds, Point};

/// A single drawable element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A run of text
    Text(TextElement),

    /// A placed raster image
    Image(ImageElement),

    /// A rectangle primitive
    Rect(RectElement),

    /// A vector path
    Path(PathElement),

    /// A straight line segment. Only used while refining; never emitted.
    Line(LineElement),
}

/// Element kind without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Text,
    Image,
    Rect,
    Path,
    Line,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Text => write!(f, "text"),
            ElementKind::Image => write!(f, "image"),
            ElementKind::Rect => write!(f, "rect"),
            ElementKind::Path => write!(f, "path"),
            ElementKind::Line => write!(f, "line"),
        }
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
            Element::Rect(_) => ElementKind::Rect,
            Element::Path(_) => ElementKind::Path,
            Element::Line(_) => ElementKind::Line,
        }
    }

    /// Bounding rectangle in page coordinates. Lines report the box spanned
    /// by their endpoints.
    pub fn bounds(&self) -> Bounds {
        match self {
            Element::Text(t) => t.bounds(),
            Element::Image(i) => i.bounds(),
            Element::Rect(r) => r.bounds(),
            Element::Path(p) => p.bounds(),
            Element::Line(l) => l.bounds(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Element::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Element::Image(_))
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, Element::Rect(_))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Element::Line(_))
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            Element::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<&RectElement> {
        match self {
            Element::Rect(r) => Some(r),
            _ => None,
        }
    }
}

impl From<TextElement> for Element {
    fn from(value: TextElement) -> Self {
        Element::Text(value)
    }
}

impl From<ImageElement> for Element {
    fn from(value: ImageElement) -> Self {
        Element::Image(value)
    }
}

impl From<RectElement> for Element {
    fn from(value: RectElement) -> Self {
        Element::Rect(value)
    }
}

impl From<PathElement> for Element {
    fn from(value: PathElement) -> Self {
        Element::Path(value)
    }
}

impl From<LineElement> for Element {
    fn from(value: LineElement) -> Self {
        Element::Line(value)
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    1.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A text span with its resolved font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub font_size: f64,
    pub font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_url: Option<String>,
    pub fill: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub linethrough: bool,
}

impl TextElement {
    /// Create black, fully opaque text with a 12pt default font.
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            text: text.into(),
            left: bounds.left,
            top: bounds.top,
            width: bounds.width,
            height: bounds.height,
            font_weight: FontWeight::Normal,
            font_size: 12.0,
            font_family: "Arial".to_string(),
            font_url: None,
            fill: "#000000".to_string(),
            opacity: 1.0,
            underline: false,
            linethrough: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.left, self.top, self.width, self.height)
    }

    /// Whether an underline or strikethrough has already been attached.
    pub fn is_decorated(&self) -> bool {
        self.underline || self.linethrough
    }
}

/// A stored image placed on the page.
///
/// `width`/`height` are the placed pixel dimensions and double as the
/// element's extent on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub transform: Vec<f64>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ImageElement {
    pub fn new(url: impl Into<String>, left: f64, top: f64, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
            left,
            top,
            transform: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Set the `masked` metadata flag.
    pub fn with_masked(mut self, masked: bool) -> Self {
        self.metadata.insert("masked".to_string(), Value::Bool(masked));
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.left,
            self.top,
            f64::from(self.width),
            f64::from(self.height),
        )
    }

    pub fn masked(&self) -> bool {
        self.metadata
            .get("masked")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A rectangle primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectElement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_line_cap: LineCap,
    #[serde(default)]
    pub stroke_line_join: LineJoin,
    #[serde(default)]
    pub stroke_dash_array: Vec<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub fill_rule: FillRule,
}

impl RectElement {
    /// Create an unstroked, unfilled rectangle.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            left: bounds.left,
            top: bounds.top,
            width: bounds.width,
            height: bounds.height,
            stroke: None,
            fill: None,
            stroke_width: 1.0,
            stroke_line_cap: LineCap::Butt,
            stroke_line_join: LineJoin::Miter,
            stroke_dash_array: Vec::new(),
            opacity: 1.0,
            fill_rule: FillRule::Nonzero,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.left, self.top, self.width, self.height)
    }

    /// Whether the fill is opaque white (`#ffffff`, any case).
    pub fn is_white_filled(&self) -> bool {
        self.fill
            .as_deref()
            .is_some_and(|fill| fill.eq_ignore_ascii_case("#ffffff"))
    }
}

/// An SVG-style vector path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElement {
    pub d: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_line_cap: LineCap,
    #[serde(default)]
    pub stroke_line_join: LineJoin,
    #[serde(default)]
    pub stroke_dash_array: Vec<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub fill_rule: FillRule,
    #[serde(default)]
    pub closed: bool,
}

impl PathElement {
    pub fn new(d: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            d: d.into(),
            left: bounds.left,
            top: bounds.top,
            width: bounds.width,
            height: bounds.height,
            stroke: None,
            fill: None,
            stroke_width: 1.0,
            stroke_line_cap: LineCap::Butt,
            stroke_line_join: LineJoin::Miter,
            stroke_dash_array: Vec::new(),
            opacity: 1.0,
            fill_rule: FillRule::Nonzero,
            closed: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.left, self.top, self.width, self.height)
    }
}

/// A straight line between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl LineElement {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stroke: None,
            stroke_width: 1.0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        line_to_bounding_box(self.start, self.end)
    }
}
