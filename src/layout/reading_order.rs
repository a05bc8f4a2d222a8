//! Column-aware reading order for page regions.
//!
//! Regions are split recursively into bands. A column cut is tried first:
//! regions that share a significant part of their horizontal extent form one
//! band, and bands are read left to right. When every region falls into a
//! single column, the same cut is tried vertically and bands are read top to
//! bottom; consecutive row bands that together still form columns are kept
//! as one section. A group that neither cut can separate is ordered by
//! [`position_order`].
//!
//! A left-column region therefore precedes a right-column region even when
//! it sits lower on the page, while a full-width title above two columns is
//! read first. Every step is a stable sort over geometry alone, so sorting
//! is deterministic and idempotent.

use std::cmp::Ordering;

use super::ReadingOrderConfig;
use crate::model::{Rect, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn span(self, rect: &Rect) -> (f64, f64) {
        match self {
            Axis::Horizontal => rect.x_span(),
            Axis::Vertical => rect.y_span(),
        }
    }
}

/// Sort regions into reading order with the default configuration.
pub fn sort_reading_order(regions: Vec<Region>) -> Vec<Region> {
    sort_reading_order_with(regions, &ReadingOrderConfig::default())
}

/// Sort regions into reading order.
pub fn sort_reading_order_with(
    regions: Vec<Region>,
    config: &ReadingOrderConfig,
) -> Vec<Region> {
    let rects: Vec<Rect> = regions.iter().map(|r| r.rect).collect();
    let mut order = Vec::with_capacity(regions.len());
    order_group(&rects, (0..rects.len()).collect(), config, &mut order);

    let mut slots: Vec<Option<Region>> = regions.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

/// Three-way comparison for regions no cut can separate: top edge first,
/// then left edge.
pub fn position_order(a: &Region, b: &Region) -> Ordering {
    rect_position_order(&a.rect, &b.rect)
}

fn rect_position_order(a: &Rect, b: &Rect) -> Ordering {
    a.y_span()
        .0
        .total_cmp(&b.y_span().0)
        .then_with(|| a.x_span().0.total_cmp(&b.x_span().0))
}

/// Group rectangles into text lines: bands of vertical overlap, top to
/// bottom, each ordered by left edge.
///
/// Returns indices into `rects`.
pub(crate) fn group_lines(rects: &[Rect], overlap_ratio: f64) -> Vec<Vec<usize>> {
    let all: Vec<usize> = (0..rects.len()).collect();
    let mut lines = split_bands(rects, &all, Axis::Vertical, overlap_ratio);
    for line in &mut lines {
        line.sort_by(|&a, &b| rects[a].x_span().0.total_cmp(&rects[b].x_span().0));
    }
    lines
}

fn order_group(
    rects: &[Rect],
    group: Vec<usize>,
    config: &ReadingOrderConfig,
    out: &mut Vec<usize>,
) {
    if group.len() <= 1 {
        out.extend(group);
        return;
    }

    let columns = split_bands(rects, &group, Axis::Horizontal, config.overlap_ratio);
    if columns.len() > 1 {
        log::trace!(
            "Column cut: {} regions into {} bands",
            group.len(),
            columns.len()
        );
        for column in columns {
            order_group(rects, column, config, out);
        }
        return;
    }

    let rows = split_bands(rects, &group, Axis::Vertical, config.overlap_ratio);
    if rows.len() > 1 {
        let sections = merge_column_rows(rects, rows, config.overlap_ratio);
        log::trace!(
            "Row cut: {} regions into {} sections",
            group.len(),
            sections.len()
        );
        for section in sections {
            order_group(rects, section, config, out);
        }
        return;
    }

    let mut group = group;
    group.sort_by(|&a, &b| rect_position_order(&rects[a], &rects[b]));
    out.extend(group);
}

/// Partition `group` into bands along `axis`, ordered by band start.
///
/// Members of each band keep their input order.
fn split_bands(
    rects: &[Rect],
    group: &[usize],
    axis: Axis,
    overlap_ratio: f64,
) -> Vec<Vec<usize>> {
    let mut sweep = group.to_vec();
    sweep.sort_by(|&a, &b| axis.span(&rects[a]).0.total_cmp(&axis.span(&rects[b]).0));

    let mut bands: Vec<((f64, f64), Vec<usize>)> = Vec::new();
    for idx in sweep {
        let span = axis.span(&rects[idx]);
        match bands.last_mut() {
            Some((band, members)) if overlaps(*band, span, overlap_ratio) => {
                band.1 = band.1.max(span.1);
                members.push(idx);
            }
            _ => bands.push((span, vec![idx])),
        }
    }

    bands
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_unstable();
            members
        })
        .collect()
}

/// Join consecutive row bands while their union still splits into columns,
/// so that two columns with aligned gaps are read column by column.
///
/// The input group could not be column-cut as a whole, so at least two
/// sections are always returned.
fn merge_column_rows(
    rects: &[Rect],
    rows: Vec<Vec<usize>>,
    overlap_ratio: f64,
) -> Vec<Vec<usize>> {
    let mut sections: Vec<Vec<usize>> = Vec::new();
    let mut rows = rows.into_iter();
    let Some(mut current) = rows.next() else {
        return sections;
    };

    for row in rows {
        let mut merged = current.clone();
        merged.extend_from_slice(&row);
        if split_bands(rects, &merged, Axis::Horizontal, overlap_ratio).len() > 1 {
            current = merged;
        } else {
            sections.push(current);
            current = row;
        }
    }
    sections.push(current);

    for section in &mut sections {
        section.sort_unstable();
    }
    sections
}

/// Whether `span` (starting at or after `band.0`) shares enough of its
/// extent with `band` to belong to it.
fn overlaps(band: (f64, f64), span: (f64, f64), ratio: f64) -> bool {
    let shared = band.1.min(span.1) - span.0;
    if shared <= 0.0 {
        return false;
    }
    let narrower = (span.1 - span.0).min(band.1 - band.0);
    shared > ratio * narrower
}
