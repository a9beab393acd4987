//! Document source abstraction.
//!
//! A [`DocumentSource`] hands over everything the independent extractors
//! produced for one document: the vector stream, the text span stream, the
//! embedded fonts, and the image assets of each page. The reconciler never
//! sees the source format itself.

mod intake;
mod raw;
mod span;

pub use intake::{validate_element, validate_stream, IntakeReport, Outcome, SkipReason};
pub use raw::RawDocument;
pub use span::{text_from_span, text_streams, RawSpan, RawTextPage};

use crate::error::Result;
use crate::model::{EmbeddedFont, PageImageAssets, PageStream};

/// Access to a document's extracted primitives.
///
/// Every method reports collaborator failures as errors; the caller aborts
/// the document on the first one.
pub trait DocumentSource {
    /// Name used for the output file and in log messages.
    fn name(&self) -> &str;

    /// Page numbers present in the document, ascending.
    fn page_numbers(&self) -> Vec<u32>;

    /// Vector primitives (rects, paths, lines and placed images) per page.
    fn vector_stream(&self) -> Result<Vec<PageStream>>;

    /// Raw text spans per page.
    fn text_stream(&self) -> Result<Vec<RawTextPage>>;

    /// Font programs embedded anywhere in the document.
    fn embedded_fonts(&self) -> Result<Vec<EmbeddedFont>>;

    /// Image resources of one page.
    ///
    /// Returns [`crate::Error::PageOutOfRange`] for a page the document does
    /// not have.
    fn page_image_assets(&self, page: u32) -> Result<PageImageAssets>;
}
