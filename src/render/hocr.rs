//! hOCR serialization of an ordered page.
//!
//! Every page becomes its own XHTML document: a fixed metadata header, one
//! `ocr_page` container, and one child per region in reading order. Tables
//! nest their resolved cell grid, figures are bare placeholders, and every
//! other region becomes an `ocrx_block` carrying its normalized kind.

use super::markup::Element;
use crate::error::Result;
use crate::layout::group_lines;
use crate::model::{BBox, Rect, Region, RegionKind, ScaleFactor, TableCellResolver, Word};

/// XHTML namespace of the root element.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Producer identity written into the `ocr-system` meta tag.
pub const OCR_SYSTEM: &str = concat!("hocrextract ", env!("CARGO_PKG_VERSION"));

/// Capability tags written into the `ocr-capabilities` meta tag.
pub const OCR_CAPABILITIES: &str = "ocr_page ocr_table ocrx_block ocrx_word";

/// Share of the shorter word height two words must overlap to sit on one line.
const LINE_OVERLAP_RATIO: f64 = 0.5;

/// Serialize one page with scale 1.0 and no words.
pub fn serialize_page<R>(
    page_num: u32,
    regions: &[Region],
    width_px: i64,
    height_px: i64,
    resolver: &R,
) -> Result<String>
where
    R: TableCellResolver + ?Sized,
{
    HocrRenderer::new(page_num, width_px, height_px, resolver).render(regions)
}

/// hOCR renderer for a single page.
pub struct HocrRenderer<'a, R: TableCellResolver + ?Sized> {
    page_num: u32,
    width_px: i64,
    height_px: i64,
    scale: ScaleFactor,
    resolver: &'a R,
    words: &'a [Word],
}

impl<'a, R: TableCellResolver + ?Sized> HocrRenderer<'a, R> {
    /// Create a renderer for page `page_num` (1-indexed) of the given pixel size.
    pub fn new(page_num: u32, width_px: i64, height_px: i64, resolver: &'a R) -> Self {
        Self {
            page_num,
            width_px,
            height_px,
            scale: ScaleFactor::IDENTITY,
            resolver,
            words: &[],
        }
    }

    /// Set the scale applied to every region coordinate.
    pub fn with_scale(mut self, scale: ScaleFactor) -> Self {
        self.scale = scale;
        self
    }

    /// Set the words used to fill block elements.
    pub fn with_words(mut self, words: &'a [Word]) -> Self {
        self.words = words;
        self
    }

    /// Render regions (already in reading order) to a pretty-printed document.
    pub fn render(&self, regions: &[Region]) -> Result<String> {
        Ok(self.build(regions)?.to_pretty_xml())
    }

    /// Build the document tree for regions already in reading order.
    pub fn build(&self, regions: &[Region]) -> Result<Element> {
        let mut page = self.page_element();
        let mut claimed = vec![false; self.words.len()];
        for region in regions {
            let element = match &region.kind {
                RegionKind::Table => self.table_element(&region.rect)?,
                RegionKind::Figure => self.figure_element(&region.rect)?,
                RegionKind::Block(token) => {
                    self.block_element(token, &region.rect, &mut claimed)?
                }
            };
            page.push(element);
        }

        let unplaced = claimed.iter().filter(|c| !**c).count();
        if unplaced > 0 {
            log::debug!(
                "Page {}: {} words outside every text block",
                self.page_num,
                unplaced
            );
        }

        let head = Element::new("head")
            .with_child(
                Element::new("meta")
                    .with_attr("name", "ocr-system")
                    .with_attr("content", OCR_SYSTEM),
            )
            .with_child(
                Element::new("meta")
                    .with_attr("name", "ocr-capabilities")
                    .with_attr("content", OCR_CAPABILITIES),
            );

        Ok(Element::new("html")
            .with_attr("xmlns", XHTML_NAMESPACE)
            .with_child(head)
            .with_child(Element::new("body").with_child(page)))
    }

    fn page_element(&self) -> Element {
        Element::new("div")
            .with_attr("class", "ocr_page")
            .with_attr("id", format!("page_{}", self.page_num))
            .with_attr(
                "title",
                format!(
                    "{}; ppageno {}",
                    BBox::new(0, 0, self.width_px, self.height_px),
                    self.page_num.saturating_sub(1)
                ),
            )
    }

    fn bbox(&self, rect: &Rect) -> Result<String> {
        Ok(BBox::from_rect(rect, self.scale)?.to_string())
    }

    fn table_element(&self, rect: &Rect) -> Result<Element> {
        let mut table = Element::new("table")
            .with_attr("class", "ocr_table")
            .with_attr("title", self.bbox(rect)?);

        let Some(grid) = self.resolver.resolve(self.page_num, rect) else {
            log::debug!(
                "Page {}: no cell grid for table at {:?}",
                self.page_num,
                rect
            );
            return Ok(table);
        };

        for row in &grid.rows {
            let mut tr = Element::new("tr").with_attr("class", "ocr_table_row");
            for cell in &row.cells {
                cell.rect.validate()?;
                let clipped = cell.rect.clip_to(rect);
                if clipped != cell.rect {
                    log::debug!(
                        "Page {}: clipped table cell {:?} to {:?}",
                        self.page_num,
                        cell.rect,
                        clipped
                    );
                }
                let mut td = Element::new("td")
                    .with_attr("class", "ocr_table_cell")
                    .with_attr("title", self.bbox(&clipped)?);
                if !cell.is_empty() {
                    if let Some(text) = &cell.text {
                        td.push_text(text.trim());
                    }
                }
                tr.push(td);
            }
            table.push(tr);
        }
        Ok(table)
    }

    fn figure_element(&self, rect: &Rect) -> Result<Element> {
        Ok(Element::new("figure")
            .with_attr("class", "ocr_float")
            .with_attr("title", self.bbox(rect)?))
    }

    /// Each word goes to the first block, in reading order, holding its centre.
    fn block_element(&self, token: &str, rect: &Rect, claimed: &mut [bool]) -> Result<Element> {
        let mut block = Element::new("div")
            .with_attr("class", "ocrx_block")
            .with_attr("data-kind", token)
            .with_attr("title", self.bbox(rect)?);

        let mut members = Vec::new();
        for (idx, word) in self.words.iter().enumerate() {
            let (x, y) = word.rect.center();
            if !claimed[idx] && rect.contains_point(x, y) {
                claimed[idx] = true;
                members.push(word);
            }
        }

        let rects: Vec<Rect> = members.iter().map(|w| w.rect).collect();
        let words = group_lines(&rects, LINE_OVERLAP_RATIO)
            .into_iter()
            .flatten()
            .map(|i| members[i]);
        for word in words {
            let mut span = Element::new("span")
                .with_attr("class", "ocrx_word")
                .with_attr("title", self.bbox(&word.rect)?);
            span.push_text(word.text.as_str());
            block.push(span);
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{NoTables, TableCell, TableGrid, TableRow};

    fn region(label: &str, top: f64, left: f64, bottom: f64, right: f64) -> Region {
        Region::from_label(label, Rect::new(top, left, bottom, right))
    }

    #[test]
    fn test_header_and_page_container() {
        let tree = HocrRenderer::new(3, 2550, 3300, &NoTables).build(&[]).unwrap();
        assert_eq!(tree.attr("xmlns"), Some(XHTML_NAMESPACE));

        let metas = tree.descendants("meta");
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].attr("name"), Some("ocr-system"));
        assert_eq!(metas[1].attr("content"), Some(OCR_CAPABILITIES));

        let page = tree.descendants("div")[0];
        assert_eq!(page.attr("class"), Some("ocr_page"));
        assert_eq!(page.attr("id"), Some("page_3"));
        assert_eq!(page.attr("title"), Some("bbox 0 0 2550 3300; ppageno 2"));
    }

    #[test]
    fn test_block_kind_token() {
        let regions = [region("Text Block", 10.0, 20.0, 100.0, 300.0)];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables).build(&regions).unwrap();

        let block = tree.descendants("div")[1];
        assert_eq!(block.attr("class"), Some("ocrx_block"));
        assert_eq!(block.attr("data-kind"), Some("text_block"));
        assert_eq!(block.attr("title"), Some("bbox 20 10 300 100"));
    }

    #[test]
    fn test_bbox_truncation_round_trip() {
        let regions = [region("Paragraph", 10.6, 5.2, 50.9, 60.1)];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables).build(&regions).unwrap();

        let title = tree.descendants("div")[1].attr("title").unwrap();
        assert_eq!(title, "bbox 5 10 60 50");
        assert_eq!(BBox::parse_title(title).unwrap(), BBox::new(5, 10, 60, 50));
    }

    #[test]
    fn test_figure_placeholder() {
        let regions = [region("Figure", 100.0, 50.0, 300.0, 250.0)];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables).build(&regions).unwrap();

        let figures = tree.descendants("figure");
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].attr("title"), Some("bbox 50 100 250 300"));
        assert!(figures[0].children().is_empty());
    }

    #[test]
    fn test_scale_applies_to_regions() {
        let regions = [region("Paragraph", 10.0, 20.0, 30.0, 40.0)];
        let tree = HocrRenderer::new(1, 1224, 1584, &NoTables)
            .with_scale(ScaleFactor::new(2.0))
            .build(&regions)
            .unwrap();
        assert_eq!(
            tree.descendants("div")[1].attr("title"),
            Some("bbox 40 20 80 60")
        );
    }

    #[test]
    fn test_table_cells_nested_and_clipped() {
        let table_rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut grid = TableGrid::new(table_rect);
        grid.add_row(TableRow::new(vec![
            TableCell::text(Rect::new(0.0, 0.0, 50.0, 50.0), "a"),
            TableCell::text(Rect::new(0.0, 50.0, 50.0, 110.0), "b"),
        ]));
        grid.add_row(TableRow::new(vec![
            TableCell::text(Rect::new(50.0, 0.0, 100.0, 50.0), "c"),
            TableCell::empty(Rect::new(50.0, 50.0, 100.0, 100.0)),
        ]));
        let grids = vec![grid];

        let regions = [Region::from_label("Table", table_rect)];
        let tree = HocrRenderer::new(1, 612, 792, &grids).build(&regions).unwrap();

        let tables = tree.descendants("table");
        assert_eq!(tables.len(), 1);
        let table_box = BBox::parse_title(tables[0].attr("title").unwrap()).unwrap();

        let cells = tables[0].descendants("td");
        assert_eq!(cells.len(), 4);
        for cell in &cells {
            let cell_box = BBox::parse_title(cell.attr("title").unwrap()).unwrap();
            assert!(table_box.contains(&cell_box));
        }
        assert_eq!(cells[1].attr("title"), Some("bbox 50 0 100 50"));
        assert_eq!(cells[0].text(), "a");
        assert!(cells[3].children().is_empty());
    }

    #[test]
    fn test_table_without_grid_is_empty() {
        let regions = [region("Table", 0.0, 0.0, 10.0, 10.0)];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables).build(&regions).unwrap();
        let tables = tree.descendants("table");
        assert_eq!(tables.len(), 1);
        assert!(tables[0].children().is_empty());
    }

    #[test]
    fn test_words_fill_blocks_in_line_order() {
        let words = vec![
            Word::new("world", Rect::new(10.2, 60.0, 20.0, 100.0)),
            Word::new("outside", Rect::new(500.0, 500.0, 510.0, 560.0)),
            Word::new("Hello", Rect::new(10.0, 10.0, 20.0, 50.0)),
            Word::new("again", Rect::new(30.0, 10.0, 40.0, 50.0)),
        ];
        let regions = [region("Paragraph", 0.0, 0.0, 50.0, 200.0)];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables)
            .with_words(&words)
            .build(&regions)
            .unwrap();

        let spans = tree.descendants("span");
        let texts: Vec<String> = spans.iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["Hello", "world", "again"]);
        assert_eq!(spans[0].attr("class"), Some("ocrx_word"));
    }

    #[test]
    fn test_words_with_fractional_tops_share_a_line() {
        let words = vec![
            Word::new("world", Rect::new(10.4, 60.0, 20.0, 100.0)),
            Word::new("Hello", Rect::new(10.6, 10.0, 20.2, 50.0)),
        ];
        let regions = [region("Paragraph", 0.0, 0.0, 50.0, 200.0)];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables)
            .with_words(&words)
            .build(&regions)
            .unwrap();

        let texts: Vec<String> = tree.descendants("span").iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["Hello", "world"]);
    }

    #[test]
    fn test_word_in_overlapping_blocks_is_emitted_once() {
        let words = vec![Word::new("shared", Rect::new(40.0, 40.0, 50.0, 80.0))];
        let regions = [
            region("Paragraph", 0.0, 0.0, 60.0, 100.0),
            region("Caption", 30.0, 20.0, 90.0, 120.0),
        ];
        let tree = HocrRenderer::new(1, 612, 792, &NoTables)
            .with_words(&words)
            .build(&regions)
            .unwrap();

        assert_eq!(tree.descendants("span").len(), 1);
        let blocks = tree.descendants("div");
        assert_eq!(blocks[1].descendants("span").len(), 1);
        assert!(blocks[2].descendants("span").is_empty());
    }

    #[test]
    fn test_malformed_region_is_rejected() {
        let regions = [region("Paragraph", f64::NAN, 0.0, 10.0, 10.0)];
        let err = HocrRenderer::new(1, 612, 792, &NoTables)
            .render(&regions)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }

    #[test]
    fn test_serialize_page_pretty_output() {
        let regions = [region("Figure", 1.0, 2.0, 3.0, 4.0)];
        let xml = serialize_page(1, &regions, 612, 792, &NoTables).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" ?>\n<html"));
        assert!(xml.contains(
            "\t\t<div class=\"ocr_page\" id=\"page_1\" title=\"bbox 0 0 612 792; ppageno 0\">\n"
        ));
        assert!(xml.contains("\t\t\t<figure class=\"ocr_float\" title=\"bbox 2 1 4 3\"/>\n"));
        assert!(xml.ends_with("</html>\n"));
    }
}
