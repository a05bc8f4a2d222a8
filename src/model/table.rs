//! Table grid types.

use serde::{Deserialize, Serialize};

use super::Rect;

/// Tolerance, in layout units, when matching a table region to its grid.
const GRID_MATCH_EPS: f64 = 0.5;

/// The cell grid of one table region, as produced upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Table rectangle
    #[serde(rename = "bbox")]
    pub rect: Rect,

    /// Rows in the table
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl TableGrid {
    /// Create a new empty grid.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            rows: Vec::new(),
        }
    }

    /// Add a row to the grid.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

/// A table cell: a rectangle with optional text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell rectangle
    #[serde(rename = "bbox")]
    pub rect: Rect,

    /// Cell text, if any was recognized upstream
    #[serde(default)]
    pub text: Option<String>,
}

impl TableCell {
    /// Create a cell with text content.
    pub fn text(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: Some(text.into()),
        }
    }

    /// Create an empty cell.
    pub fn empty(rect: Rect) -> Self {
        Self { rect, text: None }
    }

    /// Check if the cell has no text.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

/// Maps a table region back to its cell grid.
///
/// Row and column structure is derived upstream; the serializer only places
/// the resolved grid inside the page tree.
pub trait TableCellResolver {
    /// Return the grid for the table at `rect` on page `page_num`, if known.
    fn resolve(&self, page_num: u32, rect: &Rect) -> Option<&TableGrid>;
}

impl TableCellResolver for [TableGrid] {
    fn resolve(&self, _page_num: u32, rect: &Rect) -> Option<&TableGrid> {
        self.iter().find(|grid| grid.rect.approx_eq(rect, GRID_MATCH_EPS))
    }
}

impl TableCellResolver for Vec<TableGrid> {
    fn resolve(&self, page_num: u32, rect: &Rect) -> Option<&TableGrid> {
        self.as_slice().resolve(page_num, rect)
    }
}

/// Resolver for pages that carry no table grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTables;

impl TableCellResolver for NoTables {
    fn resolve(&self, _page_num: u32, _rect: &Rect) -> Option<&TableGrid> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x2() -> TableGrid {
        let mut grid = TableGrid::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        grid.add_row(TableRow::new(vec![
            TableCell::text(Rect::new(0.0, 0.0, 50.0, 50.0), "a"),
            TableCell::text(Rect::new(0.0, 50.0, 50.0, 100.0), "b"),
        ]));
        grid.add_row(TableRow::new(vec![
            TableCell::text(Rect::new(50.0, 0.0, 100.0, 50.0), "c"),
            TableCell::empty(Rect::new(50.0, 50.0, 100.0, 100.0)),
        ]));
        grid
    }

    #[test]
    fn test_grid_counts() {
        let grid = grid_2x2();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell_count(), 4);
        assert!(grid.rows[1].cells[1].is_empty());
    }

    #[test]
    fn test_resolve_by_rect() {
        let grids = vec![grid_2x2()];
        assert!(grids
            .resolve(1, &Rect::new(0.2, 0.0, 100.0, 99.9))
            .is_some());
        assert!(grids.resolve(1, &Rect::new(10.0, 0.0, 100.0, 100.0)).is_none());
        assert!(NoTables.resolve(1, &Rect::new(0.0, 0.0, 100.0, 100.0)).is_none());
    }

    #[test]
    fn test_grid_deserialize() {
        let json = r#"{
            "bbox": [0, 0, 100, 100],
            "rows": [[{"bbox": [0, 0, 50, 100], "text": "x"}]]
        }"#;
        let grid: TableGrid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.rows[0].cells[0].text.as_deref(), Some("x"));
    }
}
