//! Page layout handling: sources, scale correction, region collection and
//! reading order.

mod collect;
mod options;
mod reading_order;
mod scale;
mod source;

pub use collect::{collect_page_regions, collect_regions};
pub use options::{
    ErrorMode, ExtractOptions, MissingRasterPolicy, PageSelection, ReadingOrderConfig,
};
pub use reading_order::{position_order, sort_reading_order, sort_reading_order_with};
pub(crate) use reading_order::group_lines;
pub use scale::{compute_scale, find_background_raster};
pub use source::{FailureKind, JsonLayoutSource, LayoutFile, LayoutSource, PageRecord};
