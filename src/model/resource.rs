//! Raw image resources handed over by the image extraction backend.

use serde::{Deserialize, Serialize};

/// Where an image asset was found on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    /// An image XObject referenced from the page resources
    #[default]
    Xref,
    /// An image inlined in the page's vector rendering
    Inline,
}

/// An image the backend extracted, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Encoded image bytes
    #[serde(default)]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png"); detected from `data` when absent
    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub origin: ImageOrigin,

    /// Object number for XObject images
    #[serde(default)]
    pub xref: Option<u32>,

    /// Placed width in pixels
    pub width: u32,

    /// Placed height in pixels
    pub height: u32,

    pub left: f64,
    pub top: f64,

    /// Placement matrix as reported by the backend
    #[serde(default)]
    pub transform: Vec<f64>,

    /// A soft mask was applied as the alpha channel
    #[serde(default)]
    pub masked: bool,

    /// The image only appears as the content of a mask
    #[serde(default)]
    pub mask_only: bool,
}

impl ImageAsset {
    pub fn new(
        data: Vec<u8>,
        origin: ImageOrigin,
        left: f64,
        top: f64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            data,
            mime_type: None,
            origin,
            xref: None,
            width,
            height,
            left,
            top,
            transform: Vec::new(),
            masked: false,
            mask_only: false,
        }
    }

    /// Create an XObject image asset.
    pub fn xref(xref: u32, data: Vec<u8>, left: f64, top: f64, width: u32, height: u32) -> Self {
        let mut asset = Self::new(data, ImageOrigin::Xref, left, top, width, height);
        asset.xref = Some(xref);
        asset
    }

    /// Create an inline image asset.
    pub fn inline(data: Vec<u8>, left: f64, top: f64, width: u32, height: u32) -> Self {
        Self::new(data, ImageOrigin::Inline, left, top, width, height)
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Declared MIME type, else sniffed from the data, else PNG.
    pub fn content_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .or_else(|| Self::detect_mime_type(&self.data))
            .unwrap_or("image/png")
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.content_type() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/tiff" => "tiff",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            "image/jp2" | "image/jpeg2000" => "jp2",
            "image/svg+xml" => "svg",
            _ => "raw",
        }
    }

    /// Detect MIME type from data magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // TIFF: little-endian or big-endian
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }

        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        // JPEG 2000
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            return Some("image/jp2");
        }

        None
    }
}

/// Everything the image backend found on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageImageAssets {
    #[serde(default)]
    pub assets: Vec<ImageAsset>,

    /// Already-stored images appended verbatim after all other elements
    #[serde(default)]
    pub fallback: Vec<super::Element>,
}
