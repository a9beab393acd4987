//! JSON rendering for reconciled pages.

use std::io::Write;

use crate::error::Result;
use crate::model::Page;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert pages to a JSON array string.
pub fn to_json(pages: &[Page], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(pages)?,
        JsonFormat::Compact => serde_json::to_string(pages)?,
    };
    Ok(json)
}

/// Write pages as JSON to `writer`.
pub fn write_json<W: Write>(writer: W, pages: &[Page], format: JsonFormat) -> Result<()> {
    match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(writer, pages)?,
        JsonFormat::Compact => serde_json::to_writer(writer, pages)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::model::TextElement;

    fn sample() -> Vec<Page> {
        let mut page = Page::letter(1);
        page.add_element(TextElement::new("Hello", Bounds::new(0.0, 0.0, 10.0, 10.0)));
        vec![page]
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"pdf_items\""));
        assert!(json.contains("Hello"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.starts_with(r#"[{"number":1,"#));
    }

    #[test]
    fn test_write_json_matches_to_json() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            to_json(&sample(), JsonFormat::Compact).unwrap()
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_json(&[], JsonFormat::Compact).unwrap(), "[]");
    }
}
