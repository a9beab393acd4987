//! Font records.

use serde::{Deserialize, Serialize};

/// Human-readable style record for a font, with the location of its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub font_family: String,
    pub full_font_name: String,
    pub post_script_name: String,
    #[serde(default)]
    pub font_url: Option<String>,
}

impl FontStyle {
    pub fn new(
        font_family: impl Into<String>,
        full_font_name: impl Into<String>,
        post_script_name: impl Into<String>,
    ) -> Self {
        Self {
            font_family: font_family.into(),
            full_font_name: full_font_name.into(),
            post_script_name: post_script_name.into(),
            font_url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.font_url = Some(url.into());
        self
    }
}

impl Default for FontStyle {
    /// Arial, used when no candidate is a confident match.
    fn default() -> Self {
        Self::new("Arial", "Arial", "ArialMT")
    }
}

/// A font program embedded in the document, with the names decoded from its
/// name table. Any name the decoder could not read is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedFont {
    /// Object id of the font in the source document
    #[serde(default)]
    pub id: Option<u32>,

    /// Family name (name ID 1)
    #[serde(default)]
    pub family_name: Option<String>,

    /// Subfamily name (name ID 2)
    #[serde(default)]
    pub subfamily_name: Option<String>,

    /// Full font name (name ID 4)
    #[serde(default)]
    pub full_name: Option<String>,

    /// PostScript name (name ID 6)
    #[serde(default)]
    pub postscript_name: Option<String>,

    /// File extension of the font program, e.g. `ttf`
    #[serde(default)]
    pub ext: Option<String>,

    /// Raw font program bytes
    #[serde(default)]
    pub data: Vec<u8>,
}

impl EmbeddedFont {
    /// Full name, falling back to "family subfamily" and then to family.
    pub fn effective_full_name(&self) -> Option<String> {
        if let Some(full) = non_empty(&self.full_name) {
            return Some(full.to_string());
        }
        match (non_empty(&self.family_name), non_empty(&self.subfamily_name)) {
            (Some(family), Some(sub)) => Some(format!("{} {}", family, sub)),
            (Some(family), None) => Some(family.to_string()),
            _ => None,
        }
    }

    /// File extension with a leading dot, defaulting to `.ttf`.
    pub fn extension(&self) -> String {
        match self.ext.as_deref().map(str::trim) {
            Some(ext) if !ext.is_empty() => {
                let ext = ext.to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            }
            _ => ".ttf".to_string(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
