//! Error types for pdfscene library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfscene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconciling a document.
///
/// Recoverable conditions inside the refinement passes (malformed geometry,
/// missing page sizes, zero-area divisions, weak font matches) never surface
/// here; they are handled where they occur. Only collaborator failures reach
/// the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document source (parsing or image backend) failed.
    #[error("Source error: {0}")]
    Source(String),

    /// The storage sink failed to persist data.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A storage path is absolute or escapes the storage root.
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Processing of a whole document was aborted.
    #[error("Failed to process {document}: {source}")]
    Processing {
        /// Name of the document being processed
        document: String,
        /// The collaborator failure that aborted processing
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error as the cause of a failed document.
    pub fn in_document(self, document: impl Into<String>) -> Self {
        Error::Processing {
            document: document.into(),
            source: Box::new(self),
        }
    }
}
