//! Error types for hocrextract library.

use std::io;
use thiserror::Error;

/// Result type alias for hocrextract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning a layout into markup.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the layout or writing markup.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout file could not be deserialized.
    #[error("Layout parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream interpreter overflowed on this page; the page can be skipped.
    #[error("Content overflow on page {page}: {message}")]
    ContentOverflow {
        /// 1-indexed page number
        page: u32,
        /// Message recorded by the upstream interpreter
        message: String,
    },

    /// The upstream interpreter failed on this page in a way that cannot be skipped.
    #[error("Content error on page {page}: {message}")]
    PageContent {
        /// 1-indexed page number
        page: u32,
        /// Message recorded by the upstream interpreter
        message: String,
    },

    /// No full-page background raster was found to derive the scale from.
    #[error("No background raster on page {0}")]
    MissingBackground(u32),

    /// A bounding box is missing coordinates or holds non-finite values.
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// Page dimensions cannot be used for scaling.
    #[error("Invalid page geometry: {0}")]
    InvalidPageGeometry(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),
}

impl Error {
    /// Whether the page that raised this error may be skipped while the
    /// rest of the document is still processed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ContentOverflow { .. })
    }
}
