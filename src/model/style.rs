//! Style enumerations shared by text and vector elements.

use serde::{Deserialize, Serialize};

/// Text weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Infer weight from a raw font name such as `ABCDEF+Helvetica-Bold`.
    pub fn from_font_name(name: &str) -> Self {
        if name.to_lowercase().contains("bold") {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }
}

/// Stroke end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// Map a PDF line cap style code (0, 1, 2).
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LineCap::Round,
            2 => LineCap::Square,
            _ => LineCap::Butt,
        }
    }
}

/// Stroke join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    /// Map a PDF line join style code (0, 1, 2).
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LineJoin::Round,
            2 => LineJoin::Bevel,
            _ => LineJoin::Miter,
        }
    }
}

/// Fill rule for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

impl FillRule {
    pub fn from_even_odd(even_odd: bool) -> Self {
        if even_odd {
            FillRule::Evenodd
        } else {
            FillRule::Nonzero
        }
    }
}

/// Format a packed `0xRRGGBB` color as `#rrggbb`.
pub fn hex_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xFF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_from_name() {
        assert_eq!(FontWeight::from_font_name("Arial-BoldMT"), FontWeight::Bold);
        assert_eq!(FontWeight::from_font_name("ABCDEF+Times"), FontWeight::Normal);
    }

    #[test]
    fn test_style_codes() {
        assert_eq!(LineCap::from_code(2), LineCap::Square);
        assert_eq!(LineCap::from_code(9), LineCap::Butt);
        assert_eq!(LineJoin::from_code(1), LineJoin::Round);
        assert_eq!(FillRule::from_even_odd(true), FillRule::Evenodd);
    }

    #[test]
    fn test_style_serialization() {
        assert_eq!(serde_json::to_string(&FillRule::Evenodd).unwrap(), "\"evenodd\"");
        assert_eq!(serde_json::to_string(&LineCap::Square).unwrap(), "\"square\"");
        assert_eq!(serde_json::to_string(&FontWeight::Bold).unwrap(), "\"bold\"");
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xFF0000), "#ff0000");
        assert_eq!(hex_color(0x1FFFFFF), "#ffffff");
        assert_eq!(hex_color(0x00000A), "#00000a");
    }
}
