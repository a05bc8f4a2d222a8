//! # hocrextract
//!
//! Turns the per-page layout analysis of scanned PDF documents into hOCR
//! markup.
//!
//! The upstream collaborator interprets each page's content stream and
//! clusters it into labelled regions. This library picks up from there:
//! it derives the page's raster scale from its background image, orders the
//! regions for reading, and writes one hOCR document per page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hocrextract::{extract_file, write_document};
//!
//! fn main() -> hocrextract::Result<()> {
//!     let doc = extract_file("paper.layout.json")?;
//!     let written = write_document(&doc, "out", 0)?;
//!     println!("{} pages written", written.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Scale correction**: coordinates mapped onto the background raster
//! - **Column-aware reading order**: left column before right column
//! - **Table grids**: cells nested inside their table element
//! - **Page isolation**: pages that fail to interpret are skipped and logged
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{
    ErrorMode, ExtractOptions, JsonLayoutSource, LayoutSource, MissingRasterPolicy,
    PageSelection, ReadingOrderConfig,
};
pub use model::{
    BBox, Document, PageLayout, PageOutcome, Rect, Region, RegionKind, RenderedPage,
    ScaleFactor, SkipReason,
};
pub use pipeline::{extract_document, output_file_name, write_document};
pub use render::{serialize_page, HocrRenderer};

use std::path::{Path, PathBuf};

/// Extract every page of a layout file with default options.
///
/// # Example
///
/// ```no_run
/// use hocrextract::extract_file;
///
/// let doc = extract_file("paper.layout.json").unwrap();
/// println!("Rendered: {}", doc.rendered_count());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract a layout file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Document> {
    let source = JsonLayoutSource::open(path)?;
    extract_document(&source, options)
}

/// Builder for extracting and writing hOCR pages.
///
/// # Example
///
/// ```no_run
/// use hocrextract::{HocrExtract, MissingRasterPolicy};
///
/// let written = HocrExtract::new()
///     .with_page_offset(1)
///     .with_missing_raster(MissingRasterPolicy::Unscaled)
///     .parallel()
///     .run("paper.layout.json", "out")?;
/// # Ok::<(), hocrextract::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HocrExtract {
    options: ExtractOptions,
}

impl HocrExtract {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset added to page numbers in output file names.
    pub fn with_page_offset(mut self, offset: i64) -> Self {
        self.options = self.options.with_page_offset(offset);
        self
    }

    /// Set the policy for pages without a background raster.
    pub fn with_missing_raster(mut self, policy: MissingRasterPolicy) -> Self {
        self.options = self.options.with_missing_raster(policy);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Set reading-order tuning.
    pub fn with_reading_order(mut self, config: ReadingOrderConfig) -> Self {
        self.options = self.options.with_reading_order(config);
        self
    }

    /// Abort on content overflow instead of skipping the page.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Render pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract a layout file into an in-memory document.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        extract_file_with_options(path, &self.options)
    }

    /// Extract from any layout source.
    pub fn extract_source<S>(&self, source: &S) -> Result<Document>
    where
        S: LayoutSource + Sync + ?Sized,
    {
        extract_document(source, &self.options)
    }

    /// Extract a layout file and write its pages into `out_dir`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, path: P, out_dir: Q) -> Result<Vec<PathBuf>> {
        let document = self.extract(path)?;
        write_document(&document, out_dir, self.options.page_offset)
    }
}
