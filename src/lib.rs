//! # pdfscene
//!
//! Reconciles the independent extraction streams of a PDF page (vector
//! primitives, text spans, images) into one layered scene per page.
//!
//! Extractors each see part of a page. The vector stream does not know which
//! rectangles sit behind a photo; the text stream does not know which spans
//! are hidden under an image; decorations arrive as stray hairlines. This
//! library merges the streams, removes what a viewer would not see, folds
//! hairlines into text decorations, and orders backgrounds first.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfscene::{LocalStorage, Processor, RawDocument};
//!
//! fn main() -> pdfscene::Result<()> {
//!     let document = RawDocument::load_file("report.extracted.json")?;
//!     let result = Processor::new(LocalStorage::new("output")).process(&document)?;
//!     println!("Wrote {}", result.reference);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Fonts**: embedded fonts are stored once and matched to span font names
//! - **Text**: spans become `text` elements with resolved family and color
//! - **Images**: page images are deduplicated by digest and stored
//! - **Reconcile**: per-page occlusion, decoration and background passes,
//!   in parallel with Rayon

pub mod error;
pub mod fonts;
pub mod geometry;
pub mod images;
pub mod model;
pub mod reconcile;
pub mod refine;
pub mod render;
pub mod source;
pub mod storage;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fonts::{clean_font_name, collect_font_styles, FontResolver};
pub use geometry::{area, coverage_ratio, intersection_area, line_to_bounding_box, Bounds, Point};
pub use images::collect_page_images;
pub use model::{
    Element, ElementKind, EmbeddedFont, FontStyle, ImageAsset, ImageElement, LineElement, Page,
    PageImageAssets, PageImages, PageSize, PageStream, PathElement, RectElement, TextElement,
};
pub use reconcile::{merge_by_page, reconcile, refine_page};
pub use refine::{ReconcileOptions, RefineOptions};
pub use render::{ElementStats, JsonFormat};
pub use source::{DocumentSource, IntakeReport, Outcome, RawDocument, SkipReason};
pub use storage::{DiscardStorage, LocalStorage, StorageSink};

use std::collections::BTreeMap;
use std::path::Path;

use source::{text_streams, validate_stream};
use storage::JSON_CONTENT_TYPE;

/// Reconcile a pre-extracted document and write its assets and page JSON
/// below `output_dir`.
///
/// Returns the reference of the written JSON file.
///
/// # Example
///
/// ```no_run
/// let path = pdfscene::process_file("report.extracted.json", "output")?;
/// println!("{}", path);
/// # Ok::<(), pdfscene::Error>(())
/// ```
pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output_dir: Q) -> Result<String> {
    let document = RawDocument::load_file(input)?;
    let processor = Processor::new(LocalStorage::new(output_dir.as_ref()));
    Ok(processor.process(&document)?.reference)
}

/// A document after reconciliation, before its JSON is written.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Reconciled pages, ascending by number
    pub pages: Vec<Page>,

    /// Kept and skipped primitive counts
    pub intake: IntakeReport,

    /// Element counts per page before refinement
    pub before: BTreeMap<u32, ElementStats>,
}

impl Reconciled {
    /// Element counts per page after refinement.
    pub fn after(&self) -> BTreeMap<u32, ElementStats> {
        self.pages
            .iter()
            .map(|page| {
                (
                    page.number,
                    ElementStats::from_pages(std::slice::from_ref(page)),
                )
            })
            .collect()
    }
}

/// Result of processing a document.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Where the page JSON was stored
    pub reference: String,

    pub document: Reconciled,
}

/// Builder and driver for document processing.
///
/// # Example
///
/// ```no_run
/// use pdfscene::{JsonFormat, LocalStorage, Processor, RawDocument, RefineOptions};
///
/// let document = RawDocument::load_file("report.extracted.json")?;
/// let result = Processor::new(LocalStorage::new("output"))
///     .with_refine(RefineOptions::new().with_text_coverage(0.7))
///     .with_json_format(JsonFormat::Compact)
///     .sequential()
///     .process(&document)?;
/// # Ok::<(), pdfscene::Error>(())
/// ```
pub struct Processor<S> {
    storage: S,
    options: ReconcileOptions,
    common_fonts: Vec<FontStyle>,
    font_cutoff: f64,
    json_format: JsonFormat,
}

impl<S: StorageSink> Processor<S> {
    /// Create a processor writing to `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            options: ReconcileOptions::default(),
            common_fonts: Vec::new(),
            font_cutoff: fonts::DEFAULT_CUTOFF,
            json_format: JsonFormat::Pretty,
        }
    }

    /// Set reconciliation options.
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Set refinement thresholds.
    pub fn with_refine(mut self, refine: RefineOptions) -> Self {
        self.options = self.options.with_refine(refine);
        self
    }

    /// Fonts to match against after the document's own.
    pub fn with_common_fonts(mut self, fonts: Vec<FontStyle>) -> Self {
        self.common_fonts = fonts;
        self
    }

    /// Set the font similarity cutoff.
    pub fn with_font_cutoff(mut self, cutoff: f64) -> Self {
        self.font_cutoff = cutoff;
        self
    }

    /// Set the format of the written page JSON.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Collect fonts and images into storage and reconcile every page.
    ///
    /// Any collaborator failure aborts the document and is reported as
    /// [`Error::Processing`].
    pub fn reconcile_document<D>(&self, source: &D) -> Result<Reconciled>
    where
        D: DocumentSource + ?Sized,
    {
        self.run(source)
            .map_err(|e| e.in_document(document_name(source)))
    }

    /// Reconcile `source` and store its page JSON as `<name>.json`.
    pub fn process<D>(&self, source: &D) -> Result<ProcessResult>
    where
        D: DocumentSource + ?Sized,
    {
        let name = document_name(source);
        log::info!("Processing {}", name);

        let document = self.reconcile_document(source)?;
        let reference = self
            .write_pages(&name, &document.pages)
            .map_err(|e| e.in_document(name.clone()))?;

        log::info!("Wrote {} page(s) of {} to {}", document.pages.len(), name, reference);
        Ok(ProcessResult {
            reference,
            document,
        })
    }

    fn run<D>(&self, source: &D) -> Result<Reconciled>
    where
        D: DocumentSource + ?Sized,
    {
        let mut intake = IntakeReport::new();

        let embedded = source.embedded_fonts()?;
        let styles = collect_font_styles(&embedded, &self.storage)?;
        let resolver = FontResolver::new(styles)
            .with_common_fonts(self.common_fonts.clone())
            .with_cutoff(self.font_cutoff);

        let vectors: Vec<PageStream> = source
            .vector_stream()?
            .into_iter()
            .map(|stream| validate_stream(stream, &mut intake))
            .collect();
        let texts = text_streams(source.text_stream()?, &resolver, &mut intake);

        let mut images = BTreeMap::new();
        for number in source.page_numbers() {
            let assets = source.page_image_assets(number)?;
            let (page_images, report) = collect_page_images(assets, &self.storage)?;
            intake.merge(report);
            if !page_images.is_empty() {
                images.insert(number, page_images);
            }
        }

        let before = count_before(&[&vectors, &texts], &images);
        intake.log(source.name());

        let pages = reconcile(vec![vectors, texts], images, &self.options);
        Ok(Reconciled {
            pages,
            intake,
            before,
        })
    }

    fn write_pages(&self, name: &str, pages: &[Page]) -> Result<String> {
        let path = format!("{}.json", name);
        match self.json_format {
            JsonFormat::Pretty => self.storage.put_json(&path, pages),
            JsonFormat::Compact => {
                let json = render::to_json(pages, JsonFormat::Compact)?;
                self.storage.put_bytes(json.as_bytes(), &path, JSON_CONTENT_TYPE)
            }
        }
    }
}

fn document_name<D: DocumentSource + ?Sized>(source: &D) -> String {
    match source.name().trim() {
        "" => "document".to_string(),
        name => name.to_string(),
    }
}

fn count_before(
    streams: &[&Vec<PageStream>],
    images: &BTreeMap<u32, PageImages>,
) -> BTreeMap<u32, ElementStats> {
    let mut before: BTreeMap<u32, ElementStats> = BTreeMap::new();
    for stream in streams.iter().flat_map(|s| s.iter()) {
        let stats = before.entry(stream.number).or_default();
        stream.items.iter().for_each(|e| stats.count_element(e));
    }
    for (number, page_images) in images {
        let stats = before.entry(*number).or_default();
        page_images
            .portrait
            .iter()
            .chain(page_images.fallback.iter())
            .for_each(|e| stats.count_element(e));
    }
    for stats in before.values_mut() {
        stats.page_count = 1;
    }
    before
}
