//! Rectangle geometry used by the refinement passes.
//!
//! Coordinates use a top-left origin: `left` grows to the right and `top`
//! grows downwards, matching the page space the extractors emit.
//!
//! Every function here is total. Negative or non-finite dimensions are
//! treated as empty, so a coverage ratio can never become `NaN` and a
//! zero-area rectangle never occludes or is occluded.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (`left + width`).
    pub fn right(&self) -> f64 {
        self.left + sanitize(self.width)
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> f64 {
        self.top + sanitize(self.height)
    }

    /// Vertical center (`top + height / 2`).
    pub fn center_y(&self) -> f64 {
        self.top + sanitize(self.height) / 2.0
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Whether the horizontal span of `self` lies within that of `outer`.
    pub fn within_horizontally(&self, outer: &Bounds) -> bool {
        self.left >= outer.left && self.right() <= outer.right()
    }
}

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Negative and non-finite extents collapse to zero.
fn sanitize(extent: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        0.0
    }
}

/// Area of a rectangle. Never negative, never `NaN`.
pub fn area(rect: &Bounds) -> f64 {
    sanitize(rect.width) * sanitize(rect.height)
}

/// Area of the overlap of two rectangles.
///
/// Touching edges do not count as an intersection: the overlap must have a
/// strictly positive width and height.
pub fn intersection_area(a: &Bounds, b: &Bounds) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }

    let x_left = a.left.max(b.left);
    let y_top = a.top.max(b.top);
    let x_right = a.right().min(b.right());
    let y_bottom = a.bottom().min(b.bottom());

    if x_right <= x_left || y_bottom <= y_top {
        return 0.0;
    }

    (x_right - x_left) * (y_bottom - y_top)
}

/// Fraction of `occludee` hidden behind `occluder`, in `0.0..=1.0`.
///
/// Returns `0.0` when the occludee has no area.
pub fn coverage_ratio(occludee: &Bounds, occluder: &Bounds) -> f64 {
    let occludee_area = area(occludee);
    if occludee_area <= 0.0 {
        return 0.0;
    }
    intersection_area(occludee, occluder) / occludee_area
}

/// Bounding box spanned by the two endpoints of a line.
pub fn line_to_bounding_box(start: Point, end: Point) -> Bounds {
    let left = start.x.min(end.x);
    let top = start.y.min(end.y);
    Bounds {
        left,
        top,
        width: start.x.max(end.x) - left,
        height: start.y.max(end.y) - top,
    }
}

/// Whether `width`/`height` are each within `tolerance` of the target size.
pub fn matches_size(
    width: f64,
    height: f64,
    target_width: f64,
    target_height: f64,
    tolerance: f64,
) -> bool {
    (width - target_width).abs() <= tolerance && (height - target_height).abs() <= tolerance
}
