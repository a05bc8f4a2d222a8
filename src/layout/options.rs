//! Extraction options and configuration.

use std::ops::RangeInclusive;

/// Options for turning a layout into per-page markup.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for recoverable page errors
    pub error_mode: ErrorMode,

    /// What to do when a page has no background raster
    pub missing_raster: MissingRasterPolicy,

    /// Offset added to the page number in output file names
    pub page_offset: i64,

    /// Page selection (which pages to process)
    pub pages: PageSelection,

    /// Whether to render pages in parallel
    pub parallel: bool,

    /// Reading-order tuning
    pub reading_order: ReadingOrderConfig,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Abort on recoverable page errors instead of skipping the page.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the missing background raster policy.
    pub fn with_missing_raster(mut self, policy: MissingRasterPolicy) -> Self {
        self.missing_raster = policy;
        self
    }

    /// Set the page offset used in output file names.
    pub fn with_page_offset(mut self, offset: i64) -> Self {
        self.page_offset = offset;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set reading-order configuration.
    pub fn with_reading_order(mut self, config: ReadingOrderConfig) -> Self {
        self.reading_order = config;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            missing_raster: MissingRasterPolicy::Skip,
            page_offset: 0,
            pages: PageSelection::All,
            parallel: false,
            reading_order: ReadingOrderConfig::default(),
        }
    }
}

/// Error handling mode for recoverable page errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Log and skip pages whose content could not be interpreted
    #[default]
    Lenient,
}

/// What to do when no full-page background raster is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRasterPolicy {
    /// Leave the page out of the output
    #[default]
    Skip,
    /// Treat layout units as pixels (scale 1.0)
    Unscaled,
    /// Abort the whole run
    Fail,
}

/// Tuning for the reading-order sorter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingOrderConfig {
    /// Fraction of the narrower extent two regions must share on an axis
    /// before they are treated as the same column (or row).
    pub overlap_ratio: f64,
}

impl Default for ReadingOrderConfig {
    fn default() -> Self {
        Self { overlap_ratio: 0.1 }
    }
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Process all pages
    #[default]
    All,
    /// Process a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Process specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                pages.extend(start..=end);
            } else {
                let p: u32 = part.parse().map_err(|_| "Invalid page number")?;
                pages.push(p);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
