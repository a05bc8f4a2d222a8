//! Page-level layout types handed over by the upstream collaborator.

use serde::{Deserialize, Serialize};

use super::{ClusterMap, Rect, TableGrid};

/// Layout of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed), assigned by the layout source
    #[serde(default)]
    pub number: u32,

    /// Page width in layout units
    pub width: f64,

    /// Page height in layout units
    pub height: f64,

    /// Drawable objects, used to locate the background raster
    #[serde(default)]
    pub objects: Vec<LayoutObject>,

    /// Clustered regions keyed by upstream label
    #[serde(default)]
    pub clusters: ClusterMap,

    /// Cell grids of the page's tables
    #[serde(default)]
    pub tables: Vec<TableGrid>,

    /// Positioned words
    #[serde(default)]
    pub words: Vec<Word>,
}

impl PageLayout {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
            objects: Vec::new(),
            clusters: ClusterMap::new(),
            tables: Vec::new(),
            words: Vec::new(),
        }
    }

    /// Add a drawable object.
    pub fn add_object(&mut self, object: LayoutObject) {
        self.objects.push(object);
    }

    /// Add a clustered item under an upstream label.
    pub fn add_cluster_item(&mut self, label: impl Into<String>, rect: Rect) {
        let item = super::ClusterItem::new(self.number, self.width, self.height, rect);
        self.clusters.entry(label.into()).or_default().push(item);
    }

    /// Add a table grid.
    pub fn add_table(&mut self, grid: TableGrid) {
        self.tables.push(grid);
    }

    /// Add a positioned word.
    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Total number of clustered items.
    pub fn region_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// A drawable object in the page's layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutObject {
    /// A form XObject container
    Figure {
        /// XObject name
        #[serde(default)]
        name: String,
        /// Width in layout units
        width: f64,
        /// Height in layout units
        height: f64,
        /// Nested objects
        #[serde(default)]
        objects: Vec<LayoutObject>,
    },

    /// An embedded raster image
    Image {
        /// XObject name
        #[serde(default)]
        name: String,
        /// Width in layout units
        width: f64,
        /// Height in layout units
        height: f64,
        /// Source size in pixels (width, height)
        srcsize: (u32, u32),
    },

    /// Any other drawable (text, curves, rules)
    #[serde(other)]
    Other,
}

impl LayoutObject {
    /// Create a figure container.
    pub fn figure(
        name: impl Into<String>,
        width: f64,
        height: f64,
        objects: Vec<LayoutObject>,
    ) -> Self {
        LayoutObject::Figure {
            name: name.into(),
            width,
            height,
            objects,
        }
    }

    /// Create an image.
    pub fn image(name: impl Into<String>, width: f64, height: f64, srcsize: (u32, u32)) -> Self {
        LayoutObject::Image {
            name: name.into(),
            width,
            height,
            srcsize,
        }
    }
}

/// A background raster found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// XObject name of the image
    pub name: String,
    /// Width in pixels
    pub pixel_width: u32,
    /// Height in pixels
    pub pixel_height: u32,
}

/// A positioned word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text
    pub text: String,
    /// Word rectangle
    #[serde(rename = "bbox")]
    pub rect: Rect,
}

impl Word {
    /// Create a word.
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
        }
    }
}
