//! JSON exchange format for pre-extracted documents.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DocumentSource, RawTextPage};
use crate::error::{Error, Result};
use crate::model::{EmbeddedFont, PageImageAssets, PageStream};

/// A document whose primitives were extracted by an external parser and
/// saved as JSON.
///
/// ```json
/// {
///   "name": "report",
///   "vectors": [{ "number": 1, "size": { "width": 612, "height": 792 }, "items": [] }],
///   "text": [{ "number": 1, "spans": [] }],
///   "fonts": [],
///   "images": { "1": { "assets": [], "fallback": [] } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub name: String,

    /// Declared page count; pages are otherwise inferred from the streams
    #[serde(default)]
    pub page_count: Option<u32>,

    #[serde(default)]
    pub vectors: Vec<PageStream>,

    #[serde(default)]
    pub text: Vec<RawTextPage>,

    #[serde(default)]
    pub fonts: Vec<EmbeddedFont>,

    #[serde(default)]
    pub images: BTreeMap<u32, PageImageAssets>,
}

impl RawDocument {
    /// Load a document from a JSON file. An unnamed document takes the
    /// file stem as its name.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut doc = Self::from_bytes(&data)?;
        if doc.name.is_empty() {
            doc.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
        }
        log::info!(
            "Loaded {} ({} page(s)) from {}",
            doc.name,
            doc.page_numbers().len(),
            path.display()
        );
        Ok(doc)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl DocumentSource for RawDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_numbers(&self) -> Vec<u32> {
        if let Some(count) = self.page_count {
            return (1..=count).collect();
        }
        let numbers: BTreeSet<u32> = self
            .vectors
            .iter()
            .map(|p| p.number)
            .chain(self.text.iter().map(|p| p.number))
            .chain(self.images.keys().copied())
            .collect();
        numbers.into_iter().collect()
    }

    fn vector_stream(&self) -> Result<Vec<PageStream>> {
        Ok(self.vectors.clone())
    }

    fn text_stream(&self) -> Result<Vec<RawTextPage>> {
        Ok(self.text.clone())
    }

    fn embedded_fonts(&self) -> Result<Vec<EmbeddedFont>> {
        Ok(self.fonts.clone())
    }

    fn page_image_assets(&self, page: u32) -> Result<PageImageAssets> {
        let pages = self.page_numbers();
        if !pages.contains(&page) {
            return Err(Error::PageOutOfRange(page, pages.len() as u32));
        }
        Ok(self.images.get(&page).cloned().unwrap_or_default())
    }
}
