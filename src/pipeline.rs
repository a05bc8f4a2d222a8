//! Page pipeline: interpret, scale, collect, order, serialize and write.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::layout::{
    collect_page_regions, compute_scale, find_background_raster, sort_reading_order_with,
    ErrorMode, ExtractOptions, LayoutSource, MissingRasterPolicy,
};
use crate::model::{Document, PageLayout, PageOutcome, RenderedPage, ScaleFactor, SkipReason};
use crate::render::HocrRenderer;

/// Suffix of every output file.
pub const OUTPUT_SUFFIX: &str = "_HOCR.shtml";

/// Run every selected page of `source` through the pipeline.
///
/// Pages keep their source numbers; a skipped page leaves a
/// [`PageOutcome::Skipped`] record and does not shift later pages.
pub fn extract_document<S>(source: &S, options: &ExtractOptions) -> Result<Document>
where
    S: LayoutSource + Sync + ?Sized,
{
    let page_nums: Vec<u32> = (1..=source.page_count())
        .filter(|n| options.pages.includes(*n))
        .collect();
    log::debug!(
        "Processing {} of {} pages from {}",
        page_nums.len(),
        source.page_count(),
        source.source_stem()
    );

    let outcomes: Vec<Result<(u32, PageOutcome)>> = if options.parallel {
        page_nums
            .par_iter()
            .map(|&n| process_page(source, n, options).map(|outcome| (n, outcome)))
            .collect()
    } else {
        page_nums
            .iter()
            .map(|&n| process_page(source, n, options).map(|outcome| (n, outcome)))
            .collect()
    };

    let outcomes = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(Document::from_outcomes(source.source_stem(), outcomes))
}

/// Interpret and render a single page (1-indexed).
pub fn process_page<S>(source: &S, page_num: u32, options: &ExtractOptions) -> Result<PageOutcome>
where
    S: LayoutSource + ?Sized,
{
    let layout = match source.interpret_page(page_num) {
        Ok(layout) => layout,
        Err(Error::ContentOverflow { page, message })
            if options.error_mode == ErrorMode::Lenient =>
        {
            log::error!("Skipping page {}: content overflow: {}", page, message);
            return Ok(PageOutcome::Skipped(SkipReason::ContentOverflow(message)));
        }
        Err(e) => return Err(e),
    };
    render_page(&layout, options)
}

/// Render an interpreted page.
pub fn render_page(layout: &PageLayout, options: &ExtractOptions) -> Result<PageOutcome> {
    let (scale, page_px) = match find_background_raster(layout) {
        Some(raster) => (
            compute_scale(layout.width, &raster)?,
            (
                i64::from(raster.pixel_width),
                i64::from(raster.pixel_height),
            ),
        ),
        None => match options.missing_raster {
            MissingRasterPolicy::Skip => {
                log::warn!("Skipping page {}: no background raster", layout.number);
                return Ok(PageOutcome::Skipped(SkipReason::MissingBackground));
            }
            MissingRasterPolicy::Unscaled => {
                log::debug!(
                    "Page {}: no background raster, using layout units",
                    layout.number
                );
                let scale = ScaleFactor::IDENTITY;
                (scale, (scale.to_px(layout.width), scale.to_px(layout.height)))
            }
            MissingRasterPolicy::Fail => return Err(Error::MissingBackground(layout.number)),
        },
    };

    let regions = sort_reading_order_with(collect_page_regions(layout), &options.reading_order);
    let markup = HocrRenderer::new(layout.number, page_px.0, page_px.1, &layout.tables)
        .with_scale(scale)
        .with_words(&layout.words)
        .render(&regions)?;

    Ok(PageOutcome::Rendered(RenderedPage {
        markup,
        scale,
        region_count: regions.len(),
    }))
}

/// Output file name for a page: `{stem}-{page_num + offset:04}_HOCR.shtml`.
pub fn output_file_name(stem: &str, page_num: u32, page_offset: i64) -> String {
    format!(
        "{}-{:04}{}",
        stem,
        i64::from(page_num) + page_offset,
        OUTPUT_SUFFIX
    )
}

/// Write one file per rendered page into `out_dir`, creating it if needed.
///
/// Returns the written paths in page order.
pub fn write_document<P: AsRef<Path>>(
    document: &Document,
    out_dir: P,
    page_offset: i64,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(document.rendered_count());
    for (page_num, page) in document.rendered() {
        let path = out_dir.join(output_file_name(&document.source_stem, page_num, page_offset));
        fs::write(&path, &page.markup)?;
        log::debug!("Wrote page {} to {}", page_num, path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{JsonLayoutSource, PageSelection};
    use crate::model::{LayoutObject, Rect};

    fn scanned_page(number: u32) -> PageLayout {
        let mut page = PageLayout::new(number, 612.0, 792.0);
        page.add_object(LayoutObject::figure(
            "Fm0",
            612.0,
            792.0,
            vec![LayoutObject::image("Im0", 612.0, 792.0, (1224, 1584))],
        ));
        page.add_cluster_item("Paragraph", Rect::new(10.0, 20.0, 100.0, 300.0));
        page
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("paper", 1, 0), "paper-0001_HOCR.shtml");
        assert_eq!(output_file_name("paper", 12, 100), "paper-0112_HOCR.shtml");
        assert_eq!(output_file_name("paper", 1, -2), "paper--001_HOCR.shtml");
    }

    #[test]
    fn test_render_page_applies_scale() {
        let outcome = render_page(&scanned_page(1), &ExtractOptions::default()).unwrap();
        let PageOutcome::Rendered(page) = outcome else {
            panic!("expected rendered page");
        };
        assert_eq!(page.scale.value(), 2.0);
        assert_eq!(page.region_count, 1);
        assert!(page.markup.contains("title=\"bbox 0 0 1224 1584; ppageno 0\""));
        assert!(page.markup.contains("title=\"bbox 40 20 600 200\""));
    }

    #[test]
    fn test_page_box_uses_raster_pixel_size() {
        let mut page = PageLayout::new(1, 792.0, 612.0);
        page.add_object(LayoutObject::figure(
            "Fm0",
            792.0,
            612.0,
            vec![LayoutObject::image("Im0", 792.0, 612.0, (1654, 1278))],
        ));
        let PageOutcome::Rendered(rendered) =
            render_page(&page, &ExtractOptions::default()).unwrap()
        else {
            panic!("expected rendered page");
        };
        assert!(rendered.markup.contains("bbox 0 0 1654 1278; ppageno 0"));
    }

    #[test]
    fn test_missing_raster_policies() {
        let mut page = PageLayout::new(4, 612.0, 792.0);
        page.add_cluster_item("Paragraph", Rect::new(10.0, 20.0, 100.0, 300.0));

        let skipped = render_page(&page, &ExtractOptions::default()).unwrap();
        assert!(matches!(
            skipped,
            PageOutcome::Skipped(SkipReason::MissingBackground)
        ));

        let options = ExtractOptions::new().with_missing_raster(MissingRasterPolicy::Unscaled);
        let PageOutcome::Rendered(rendered) = render_page(&page, &options).unwrap() else {
            panic!("expected rendered page");
        };
        assert_eq!(rendered.scale, ScaleFactor::IDENTITY);
        assert!(rendered.markup.contains("bbox 0 0 612 792; ppageno 3"));

        let options = ExtractOptions::new().with_missing_raster(MissingRasterPolicy::Fail);
        assert!(matches!(
            render_page(&page, &options),
            Err(Error::MissingBackground(4))
        ));
    }

    const THREE_PAGES: &str = r#"{
        "pages": [
            {"status": "ok", "width": 100, "height": 100,
             "clusters": {"Paragraph": [[1, 100, 100, 0, 0, 10, 10]]}},
            {"status": "failed", "error": "overflow", "message": "int too large"},
            {"status": "ok", "width": 100, "height": 100}
        ]
    }"#;

    #[test]
    fn test_overflow_page_is_skipped() {
        let source = JsonLayoutSource::from_json(THREE_PAGES, "doc").unwrap();
        let options = ExtractOptions::new().with_missing_raster(MissingRasterPolicy::Unscaled);
        let doc = extract_document(&source, &options).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.rendered_count(), 2);
        let skipped: Vec<u32> = doc.skipped().map(|(n, _)| n).collect();
        assert_eq!(skipped, vec![2]);
    }

    #[test]
    fn test_strict_mode_aborts_on_overflow() {
        let source = JsonLayoutSource::from_json(THREE_PAGES, "doc").unwrap();
        let options = ExtractOptions::new()
            .with_missing_raster(MissingRasterPolicy::Unscaled)
            .strict();
        assert!(matches!(
            extract_document(&source, &options),
            Err(Error::ContentOverflow { page: 2, .. })
        ));
    }

    #[test]
    fn test_page_selection_and_parallel() {
        let source = JsonLayoutSource::from_json(THREE_PAGES, "doc").unwrap();
        let options = ExtractOptions::new()
            .with_missing_raster(MissingRasterPolicy::Unscaled)
            .with_pages(PageSelection::Pages(vec![1, 3]))
            .with_parallel(true);
        let doc = extract_document(&source, &options).unwrap();

        let rendered: Vec<u32> = doc.rendered().map(|(n, _)| n).collect();
        assert_eq!(rendered, vec![1, 3]);
        assert!(doc.get_page(2).is_none());
    }
}
