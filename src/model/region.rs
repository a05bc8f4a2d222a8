//! Typed regions and the clustered items they are collected from.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Rect;
use crate::error::{Error, Result};

/// Mapping from upstream cluster label (e.g. `"Text Block"`) to its items.
///
/// Insertion order is kept so that collection is byte-stable across runs.
pub type ClusterMap = IndexMap<String, Vec<ClusterItem>>;

/// Kind of a region on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// A table, rendered with nested cells
    Table,
    /// A figure, rendered as a placeholder
    Figure,
    /// Any other text/block kind, holding its normalized token
    Block(String),
}

impl RegionKind {
    /// Normalize an upstream label: lowercase, spaces replaced with underscores.
    ///
    /// `"Text Block"` becomes `text_block`.
    pub fn normalize(label: &str) -> String {
        label.to_lowercase().replace(' ', "_")
    }

    /// Classify an upstream label.
    pub fn from_label(label: &str) -> Self {
        let token = Self::normalize(label);
        match token.as_str() {
            "table" => RegionKind::Table,
            "figure" => RegionKind::Figure,
            _ => RegionKind::Block(token),
        }
    }

    /// The normalized token written into markup.
    pub fn token(&self) -> &str {
        match self {
            RegionKind::Table => "table",
            RegionKind::Figure => "figure",
            RegionKind::Block(token) => token,
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A typed bounding box on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Region kind
    pub kind: RegionKind,
    /// Rectangle in layout units
    pub rect: Rect,
}

impl Region {
    /// Create a region.
    pub fn new(kind: RegionKind, rect: Rect) -> Self {
        Self { kind, rect }
    }

    /// Create a region from an upstream label.
    pub fn from_label(label: &str, rect: Rect) -> Self {
        Self::new(RegionKind::from_label(label), rect)
    }

    /// Check if this region is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, RegionKind::Table)
    }

    /// Check if this region is a figure.
    pub fn is_figure(&self) -> bool {
        matches!(self.kind, RegionKind::Figure)
    }
}

/// One positioned item from the upstream cluster map.
///
/// Serialized as `[page_index, page_width, page_height, top, left, bottom, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 7]")]
pub struct ClusterItem {
    /// Page index recorded upstream
    pub page_index: f64,
    /// Page width recorded upstream
    pub page_width: f64,
    /// Page height recorded upstream
    pub page_height: f64,
    /// Item rectangle
    pub rect: Rect,
}

impl ClusterItem {
    /// Create an item.
    pub fn new(page_index: u32, page_width: f64, page_height: f64, rect: Rect) -> Self {
        Self {
            page_index: f64::from(page_index),
            page_width,
            page_height,
            rect,
        }
    }
}

impl TryFrom<Vec<f64>> for ClusterItem {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        let [page_index, page_width, page_height, coords @ ..] = values.as_slice() else {
            return Err(Error::MalformedGeometry(format!(
                "cluster item needs 7 values, got {}",
                values.len()
            )));
        };
        Ok(Self {
            page_index: *page_index,
            page_width: *page_width,
            page_height: *page_height,
            rect: Rect::from_slice(coords)?,
        })
    }
}

impl From<ClusterItem> for [f64; 7] {
    fn from(item: ClusterItem) -> Self {
        let r = item.rect;
        [
            item.page_index,
            item.page_width,
            item.page_height,
            r.top,
            r.left,
            r.bottom,
            r.right,
        ]
    }
}
