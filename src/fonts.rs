//! Font collection and resolution.
//!
//! Embedded font programs are stored once per PostScript name and described
//! by [`FontStyle`] records. Raw span font names are then matched against
//! those records by string similarity.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{EmbeddedFont, FontStyle};
use crate::storage::StorageSink;

/// Minimum similarity for a font match.
pub const DEFAULT_CUTOFF: f64 = 0.6;

fn subset_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{3,6}\+").expect("constant pattern"))
}

fn mt_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?MT$").expect("constant pattern"))
}

/// Strip the subset tag and a trailing `MT` from a raw font name.
///
/// `"ABCDEF+Arial-BoldMT"` becomes `"Arial-Bold"`.
pub fn clean_font_name(raw: &str) -> String {
    let name = subset_prefix().replace(raw, "");
    let name = mt_suffix().replace(&name, "");
    name.trim().to_string()
}

fn normalize(name: &str) -> String {
    name.nfkc().collect()
}

/// Matches raw font names to known font styles.
///
/// Candidates are the document's own embedded fonts followed by an optional
/// list of common fonts. A raw name resolves to the candidate whose full
/// font name is most similar; when no candidate reaches the cutoff, the
/// default record is used.
#[derive(Debug, Clone)]
pub struct FontResolver {
    candidates: Vec<FontStyle>,
    /// NFKC forms of the candidates' full font names, same order
    normalized: Vec<String>,
    default: FontStyle,
    cutoff: f64,
}

impl FontResolver {
    pub fn new(candidates: Vec<FontStyle>) -> Self {
        let normalized = candidates
            .iter()
            .map(|c| normalize(&c.full_font_name))
            .collect();
        Self {
            candidates,
            normalized,
            default: FontStyle::default(),
            cutoff: DEFAULT_CUTOFF,
        }
    }

    /// Append common fonts after the document's own candidates.
    pub fn with_common_fonts(mut self, fonts: Vec<FontStyle>) -> Self {
        self.normalized
            .extend(fonts.iter().map(|c| normalize(&c.full_font_name)));
        self.candidates.extend(fonts);
        self
    }

    pub fn with_default(mut self, default: FontStyle) -> Self {
        self.default = default;
        self
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Load a JSON array of font style records.
    pub fn load_common_fonts<P: AsRef<Path>>(path: P) -> Result<Vec<FontStyle>> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn candidates(&self) -> &[FontStyle] {
        &self.candidates
    }

    pub fn default_style(&self) -> &FontStyle {
        &self.default
    }

    /// Resolve a raw span font name.
    ///
    /// Ties keep the earliest candidate.
    pub fn resolve(&self, raw: &str) -> &FontStyle {
        let query = normalize(&clean_font_name(raw));

        let mut best: Option<(usize, f64)> = None;
        for (idx, name) in self.normalized.iter().enumerate() {
            let score = strsim::normalized_levenshtein(&query, name);
            if score < self.cutoff {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }

        match best {
            Some((idx, score)) => {
                log::trace!(
                    "Font '{}' matched '{}' ({:.2})",
                    raw,
                    self.candidates[idx].full_font_name,
                    score
                );
                &self.candidates[idx]
            }
            None => {
                log::debug!("Font '{}' has no close match, using default", raw);
                &self.default
            }
        }
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn font_content_type(ext: &str) -> &'static str {
    match ext {
        ".otf" => "font/otf",
        ".woff" => "font/woff",
        ".woff2" => "font/woff2",
        _ => "font/ttf",
    }
}

/// Accumulator for [`collect_font_styles`].
#[derive(Debug, Default)]
struct FontSeen {
    ids: HashSet<u32>,
    postscript_names: HashSet<String>,
    styles: Vec<FontStyle>,
}

/// Store each distinct embedded font and describe it.
///
/// Fonts are skipped when their id was already handled, when they carry no
/// bytes, when any of their names is unknown, or when their PostScript name
/// was already stored. Styles come back in first-seen order.
pub fn collect_font_styles<S>(fonts: &[EmbeddedFont], storage: &S) -> Result<Vec<FontStyle>>
where
    S: StorageSink + ?Sized,
{
    let seen = fonts
        .iter()
        .try_fold(FontSeen::default(), |mut seen, font| -> Result<FontSeen> {
            if let Some(id) = font.id {
                if !seen.ids.insert(id) {
                    return Ok(seen);
                }
            }

            if font.data.is_empty() {
                log::debug!("Font {:?} has no program data", font.id);
                return Ok(seen);
            }

            let (Some(family), Some(postscript), Some(full)) = (
                font.family_name.as_deref().filter(|s| !s.is_empty()),
                font.postscript_name.as_deref().filter(|s| !s.is_empty()),
                font.effective_full_name(),
            ) else {
                log::debug!("Font {:?} has unreadable names", font.id);
                return Ok(seen);
            };

            if seen.postscript_names.contains(postscript) {
                return Ok(seen);
            }

            let ext = font.extension();
            let path = format!("fonts/{}{}", sanitize_file_stem(postscript), ext);
            let url = storage.put_bytes(&font.data, &path, font_content_type(&ext))?;

            seen.postscript_names.insert(postscript.to_string());
            seen.styles
                .push(FontStyle::new(family, full, postscript).with_url(url));
            Ok(seen)
        })?;

    log::info!(
        "Collected {} font style(s) from {} embedded font(s)",
        seen.styles.len(),
        fonts.len()
    );
    Ok(seen.styles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        writes: Mutex<Vec<String>>,
    }

    impl StorageSink for MemoryStorage {
        fn put_bytes(&self, _data: &[u8], path: &str, _content_type: &str) -> Result<String> {
            self.writes.lock().unwrap().push(path.to_string());
            Ok(format!("mem://{}", path))
        }
    }

    fn font(id: u32, family: &str, postscript: &str) -> EmbeddedFont {
        EmbeddedFont {
            id: Some(id),
            family_name: Some(family.to_string()),
            subfamily_name: Some("Regular".to_string()),
            full_name: None,
            postscript_name: Some(postscript.to_string()),
            ext: Some("ttf".to_string()),
            data: vec![0, 1, 0, 0],
        }
    }

    #[test]
    fn test_clean_font_name() {
        assert_eq!(clean_font_name("ABCDEF+Arial-BoldMT"), "Arial-Bold");
        assert_eq!(clean_font_name("TimesNewRomanPSMT"), "TimesNewRomanPS");
        assert_eq!(clean_font_name("Helvetica"), "Helvetica");
        // Lowercase tags are not subset prefixes.
        assert_eq!(clean_font_name("abcdef+Foo"), "abcdef+Foo");
        assert_eq!(clean_font_name("  Roboto  "), "Roboto");
    }

    #[test]
    fn test_resolve_best_match() {
        let resolver = FontResolver::new(vec![
            FontStyle::new("Roboto", "Roboto Regular", "Roboto-Regular"),
            FontStyle::new("Arial", "Arial Bold", "Arial-BoldMT"),
        ]);
        assert_eq!(resolver.resolve("XYZABC+Arial Bold").post_script_name, "Arial-BoldMT");
        assert_eq!(resolver.resolve("Roboto-Regular").font_family, "Roboto");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let resolver = FontResolver::new(vec![FontStyle::new(
            "Roboto",
            "Roboto Regular",
            "Roboto-Regular",
        )]);
        assert_eq!(resolver.resolve("Wingdings"), &FontStyle::default());
        assert_eq!(FontResolver::default().resolve("Anything").font_family, "Arial");
    }

    #[test]
    fn test_resolve_tie_keeps_first() {
        let resolver = FontResolver::new(vec![
            FontStyle::new("First", "Lato", "Lato-1"),
            FontStyle::new("Second", "Lato", "Lato-2"),
        ]);
        assert_eq!(resolver.resolve("Lato").font_family, "First");
    }

    #[test]
    fn test_common_fonts_come_after_document_fonts() {
        let resolver = FontResolver::new(vec![FontStyle::new("Doc", "Lato", "Lato-Doc")])
            .with_common_fonts(vec![FontStyle::new("Common", "Lato", "Lato-Common")]);
        assert_eq!(resolver.candidates().len(), 2);
        assert_eq!(resolver.resolve("Lato").font_family, "Doc");
    }

    #[test]
    fn test_cutoff_is_configurable() {
        let resolver = FontResolver::new(vec![FontStyle::new("Lato", "Lato", "Lato")]);
        assert_eq!(resolver.resolve("Lato Hairline Italic").font_family, "Arial");
        let lenient = resolver.with_cutoff(0.1);
        assert_eq!(lenient.resolve("Lato Hairline Italic").font_family, "Lato");
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Arial-Bold MT"), "Arial_Bold_MT");
        assert_eq!(sanitize_file_stem("Noto_Sans"), "Noto_Sans");
    }

    #[test]
    fn test_collect_font_styles_dedupes() {
        let storage = MemoryStorage::default();
        let mut unnamed = font(4, "Ghost", "Ghost");
        unnamed.postscript_name = None;
        let mut empty = font(5, "Empty", "Empty");
        empty.data.clear();

        let fonts = vec![
            font(1, "Roboto", "Roboto-Regular"),
            font(1, "Roboto", "Roboto-Regular"),
            font(2, "Roboto", "Roboto-Regular"),
            font(3, "Lato", "Lato Bold"),
            unnamed,
            empty,
        ];

        let styles = collect_font_styles(&fonts, &storage).unwrap();
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[0].full_font_name, "Roboto Regular");
        assert_eq!(
            styles[0].font_url.as_deref(),
            Some("mem://fonts/Roboto_Regular.ttf")
        );
        assert_eq!(styles[1].post_script_name, "Lato Bold");
        assert_eq!(
            *storage.writes.lock().unwrap(),
            vec!["fonts/Roboto_Regular.ttf", "fonts/Lato_Bold.ttf"]
        );
    }
}
