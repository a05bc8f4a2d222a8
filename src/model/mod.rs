//! Model types for page layouts and extraction results.
//!
//! This module defines the intermediate representation that bridges the
//! upstream layout collaborator and markup rendering: typed regions with
//! layout-unit rectangles, page layouts, table grids and the per-page
//! results of a run.

mod document;
mod geometry;
mod page;
mod region;
mod table;

pub use document::{Document, PageOutcome, RenderedPage, SkipReason};
pub use geometry::{BBox, Rect, ScaleFactor};
pub use page::{LayoutObject, PageLayout, RasterImage, Word};
pub use region::{ClusterItem, ClusterMap, Region, RegionKind};
pub use table::{NoTables, TableCell, TableCellResolver, TableGrid, TableRow};
