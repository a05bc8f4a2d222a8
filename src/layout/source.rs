//! Layout source abstraction layer.
//!
//! Provides a trait-based interface to the upstream layout collaborator,
//! isolating content-stream interpretation and clustering from the markup
//! pipeline. [`JsonLayoutSource`] reads the JSON hand-off file that the
//! collaborator writes.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PageLayout;

/// Abstract interface to per-page layouts.
pub trait LayoutSource {
    /// Stem of the original source document, used to name outputs.
    fn source_stem(&self) -> &str;

    /// Number of pages in the source document.
    fn page_count(&self) -> u32;

    /// Interpret one page (1-indexed).
    ///
    /// Returns [`Error::ContentOverflow`] when the page's content overflowed
    /// during interpretation; callers may skip such pages.
    fn interpret_page(&self, page_num: u32) -> Result<PageLayout>;
}

/// The JSON hand-off file written by the upstream collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFile {
    /// Name of the original source document (e.g. `paper.pdf`)
    #[serde(default)]
    pub source: Option<String>,

    /// One record per source page, in page order
    pub pages: Vec<PageRecord>,
}

/// Upstream result for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageRecord {
    /// The page was interpreted and clustered
    Ok(PageLayout),

    /// Interpretation failed upstream
    Failed {
        /// Failure class
        error: FailureKind,
        /// Upstream message
        #[serde(default)]
        message: String,
    },
}

/// Class of an upstream page failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Numeric overflow while interpreting the content stream
    Overflow,
    /// Anything else
    #[serde(other)]
    Other,
}

/// [`LayoutSource`] backed by a [`LayoutFile`].
#[derive(Debug, Clone)]
pub struct JsonLayoutSource {
    stem: String,
    pages: Vec<PageRecord>,
}

impl JsonLayoutSource {
    /// Load from a file path.
    ///
    /// The output stem is taken from the file's `source` entry, falling back
    /// to the layout file's own stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let file: LayoutFile = serde_json::from_str(&data)?;
        let fallback = file_stem(path);
        Ok(Self::from_layout_file(file, &fallback))
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str, fallback_stem: &str) -> Result<Self> {
        let file: LayoutFile = serde_json::from_str(json)?;
        Ok(Self::from_layout_file(file, fallback_stem))
    }

    /// Load from a reader.
    pub fn from_reader<R: Read>(reader: R, fallback_stem: &str) -> Result<Self> {
        let file: LayoutFile = serde_json::from_reader(reader)?;
        Ok(Self::from_layout_file(file, fallback_stem))
    }

    /// Wrap an already deserialized layout file.
    pub fn from_layout_file(file: LayoutFile, fallback_stem: &str) -> Self {
        let stem = file
            .source
            .as_deref()
            .map(|s| file_stem(Path::new(s)))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback_stem.to_string());
        Self {
            stem,
            pages: file.pages,
        }
    }
}

impl LayoutSource for JsonLayoutSource {
    fn source_stem(&self) -> &str {
        &self.stem
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn interpret_page(&self, page_num: u32) -> Result<PageLayout> {
        let record = page_num
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))?;

        match record {
            PageRecord::Ok(layout) => {
                let mut layout = layout.clone();
                layout.number = page_num;
                Ok(layout)
            }
            PageRecord::Failed {
                error: FailureKind::Overflow,
                message,
            } => Err(Error::ContentOverflow {
                page: page_num,
                message: message.clone(),
            }),
            PageRecord::Failed { message, .. } => Err(Error::PageContent {
                page: page_num,
                message: message.clone(),
            }),
        }
    }
}

/// File stem of a path as an owned string.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}
