//! Element statistics for reconciled output.

use serde::{Deserialize, Serialize};

use crate::model::{Element, ElementKind, Page, PageStream};

/// Element counts by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStats {
    /// Total number of pages counted
    pub page_count: u32,

    pub text_count: u32,
    pub image_count: u32,
    pub rect_count: u32,
    pub path_count: u32,
    pub line_count: u32,

    /// Texts carrying an underline or strikethrough
    pub decorated_count: u32,
}

impl ElementStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every element of the given pages.
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut stats = Self::new();
        for page in pages {
            stats.add_page();
            page.pdf_items.iter().for_each(|e| stats.count_element(e));
        }
        stats
    }

    /// Count raw extractor streams; a page present in several streams
    /// counts once per stream.
    pub fn from_streams(streams: &[PageStream]) -> Self {
        let mut stats = Self::new();
        for stream in streams {
            stats.add_page();
            stream.items.iter().for_each(|e| stats.count_element(e));
        }
        stats
    }

    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    pub fn count_element(&mut self, element: &Element) {
        match element.kind() {
            ElementKind::Text => {
                self.text_count += 1;
                if element.as_text().is_some_and(|t| t.is_decorated()) {
                    self.decorated_count += 1;
                }
            }
            ElementKind::Image => self.image_count += 1,
            ElementKind::Rect => self.rect_count += 1,
            ElementKind::Path => self.path_count += 1,
            ElementKind::Line => self.line_count += 1,
        }
    }

    /// Total number of elements.
    pub fn element_count(&self) -> u32 {
        self.text_count + self.image_count + self.rect_count + self.path_count + self.line_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ElementStats) {
        self.page_count += other.page_count;
        self.text_count += other.text_count;
        self.image_count += other.image_count;
        self.rect_count += other.rect_count;
        self.path_count += other.path_count;
        self.line_count += other.line_count;
        self.decorated_count += other.decorated_count;
    }
}
