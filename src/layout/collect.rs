//! Flattening of the per-page cluster map into typed regions.

use crate::model::{ClusterItem, ClusterMap, PageLayout, Region, RegionKind};

/// Tolerance when checking an item's recorded page size against the page.
const PAGE_SIZE_EPS: f64 = 0.5;

/// Flatten a cluster map into regions, label by label in map order.
pub fn collect_regions(clusters: &ClusterMap) -> Vec<Region> {
    clusters
        .iter()
        .flat_map(|(label, items)| {
            let kind = RegionKind::from_label(label);
            items
                .iter()
                .map(move |item| Region::new(kind.clone(), item.rect))
        })
        .collect()
}

/// Collect a page's regions, checking each item's recorded page index and
/// size against the page first.
///
/// The recorded values are redundant; a mismatch is logged and the item is
/// still collected.
pub fn collect_page_regions(page: &PageLayout) -> Vec<Region> {
    for (label, items) in &page.clusters {
        for item in items {
            if !matches_page(item, page) {
                log::warn!(
                    "Page {}: {} item recorded for page {} ({}x{}), page is {}x{}",
                    page.number,
                    label,
                    item.page_index,
                    item.page_width,
                    item.page_height,
                    page.width,
                    page.height
                );
            }
        }
    }

    let regions = collect_regions(&page.clusters);
    log::debug!("Page {}: collected {} regions", page.number, regions.len());
    regions
}

fn matches_page(item: &ClusterItem, page: &PageLayout) -> bool {
    item.page_index == f64::from(page.number)
        && (item.page_width - page.width).abs() <= PAGE_SIZE_EPS
        && (item.page_height - page.height).abs() <= PAGE_SIZE_EPS
}
