//! Page-level types.

use super::{Element, ElementKind};
use serde::{Deserialize, Serialize};

/// Declared page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4 (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// A size the refinement passes can compare against: finite and positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A reconciled page: its elements in paint order (later entries cover
/// earlier ones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Declared page size, if any extractor reported one
    pub size: Option<PageSize>,

    /// Elements in z-order
    pub pdf_items: Vec<Element>,
}

impl Page {
    pub fn new(number: u32, size: PageSize) -> Self {
        Self {
            number,
            size: Some(size),
            pdf_items: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size.
    pub fn letter(number: u32) -> Self {
        Self::new(number, PageSize::letter())
    }

    pub fn add_element(&mut self, element: impl Into<Element>) {
        self.pdf_items.push(element.into());
    }

    pub fn is_empty(&self) -> bool {
        self.pdf_items.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.pdf_items.len()
    }

    /// Number of elements of the given kind.
    pub fn count_of(&self, kind: ElementKind) -> usize {
        self.pdf_items.iter().filter(|e| e.kind() == kind).count()
    }
}

/// One extractor's primitives for one page, in source paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStream {
    pub number: u32,
    #[serde(default)]
    pub size: Option<PageSize>,
    #[serde(default)]
    pub items: Vec<Element>,
}

impl PageStream {
    pub fn new(number: u32, size: Option<PageSize>, items: Vec<Element>) -> Self {
        Self {
            number,
            size,
            items,
        }
    }
}

/// Images extracted directly from a page's image resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageImages {
    /// Full-resolution images, in paint order
    pub portrait: Vec<Element>,

    /// Images appended after everything else, never filtered
    pub fallback: Vec<Element>,
}

impl PageImages {
    pub fn new(portrait: Vec<Element>, fallback: Vec<Element>) -> Self {
        Self { portrait, fallback }
    }

    pub fn is_empty(&self) -> bool {
        self.portrait.is_empty() && self.fallback.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::model::{RectElement, TextElement};

    #[test]
    fn test_page_new() {
        let page = Page::letter(1);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, Some(PageSize::new(612.0, 792.0)));
        assert!(page.is_empty());
    }

    #[test]
    fn test_page_key_order() {
        let mut page = Page::new(3, PageSize::a4());
        page.add_element(RectElement::new(Bounds::new(0.0, 0.0, 1.0, 1.0)));
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.starts_with(r#"{"number":3,"size":{"width":595.0,"height":842.0},"pdf_items":[{"type":"rect""#));
    }

    #[test]
    fn test_count_of() {
        let mut page = Page::letter(1);
        page.add_element(TextElement::new("a", Bounds::new(0.0, 0.0, 5.0, 5.0)));
        page.add_element(TextElement::new("b", Bounds::new(0.0, 0.0, 5.0, 5.0)));
        page.add_element(RectElement::new(Bounds::new(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(page.count_of(ElementKind::Text), 2);
        assert_eq!(page.count_of(ElementKind::Image), 0);
        assert_eq!(page.element_count(), 3);
    }

    #[test]
    fn test_page_size_usable() {
        assert!(PageSize::letter().is_usable());
        assert!(!PageSize::new(0.0, 792.0).is_usable());
        assert!(!PageSize::new(f64::NAN, 792.0).is_usable());
    }
}
