//! Document-level results.

use std::collections::BTreeMap;

use super::ScaleFactor;

/// The per-page results of one extraction run.
///
/// Pages are keyed by their original 1-indexed number; a skipped page keeps
/// its slot so later pages are never renumbered.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Stem of the source file, used to name output files
    pub source_stem: String,

    /// Outcome of every processed page, in page order
    pub pages: BTreeMap<u32, PageOutcome>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(source_stem: impl Into<String>) -> Self {
        Self {
            source_stem: source_stem.into(),
            pages: BTreeMap::new(),
        }
    }

    /// Build a document from per-page outcomes.
    pub fn from_outcomes(
        source_stem: impl Into<String>,
        outcomes: impl IntoIterator<Item = (u32, PageOutcome)>,
    ) -> Self {
        Self {
            source_stem: source_stem.into(),
            pages: outcomes.into_iter().collect(),
        }
    }

    /// Get the number of processed pages (rendered and skipped).
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get the outcome of a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&PageOutcome> {
        self.pages.get(&page_num)
    }

    /// Iterate over rendered pages in page order.
    pub fn rendered(&self) -> impl Iterator<Item = (u32, &RenderedPage)> {
        self.pages.iter().filter_map(|(num, outcome)| match outcome {
            PageOutcome::Rendered(page) => Some((*num, page)),
            PageOutcome::Skipped(_) => None,
        })
    }

    /// Iterate over skipped pages in page order.
    pub fn skipped(&self) -> impl Iterator<Item = (u32, &SkipReason)> {
        self.pages.iter().filter_map(|(num, outcome)| match outcome {
            PageOutcome::Skipped(reason) => Some((*num, reason)),
            PageOutcome::Rendered(_) => None,
        })
    }

    /// Number of rendered pages.
    pub fn rendered_count(&self) -> usize {
        self.rendered().count()
    }

    /// Check if the document has no processed pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// What happened to one page.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The page was serialized
    Rendered(RenderedPage),
    /// The page was left out of the output
    Skipped(SkipReason),
}

impl PageOutcome {
    /// Check if the page was rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(self, PageOutcome::Rendered(_))
    }
}

/// Markup of a rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Pretty-printed hOCR document
    pub markup: String,
    /// Scale applied to the page's coordinates
    pub scale: ScaleFactor,
    /// Number of regions written
    pub region_count: usize,
}

/// Why a page was left out.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The upstream interpreter overflowed on the page
    ContentOverflow(String),
    /// No background raster was found to derive the scale from
    MissingBackground,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ContentOverflow(message) => write!(f, "content overflow: {}", message),
            SkipReason::MissingBackground => f.write_str("no background raster"),
        }
    }
}
