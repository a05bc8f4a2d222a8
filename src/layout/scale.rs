//! Scale correction from a page's background raster.
//!
//! Scanned documents carry the page scan as a full-width image inside a form
//! XObject. Its pixel width over the page's layout width gives the factor
//! that maps layout coordinates onto the raster.

use crate::error::{Error, Result};
use crate::model::{LayoutObject, PageLayout, RasterImage, ScaleFactor};

/// Tolerance, in layout units, when comparing a figure's width to the page's.
const WIDTH_EPS: f64 = 1e-3;

/// Compute the scale factor `raster.pixel_width / page_width`.
pub fn compute_scale(page_width: f64, raster: &RasterImage) -> Result<ScaleFactor> {
    if !page_width.is_finite() || page_width <= 0.0 {
        return Err(Error::InvalidPageGeometry(format!(
            "page width must be positive, got {}",
            page_width
        )));
    }
    Ok(ScaleFactor::new(f64::from(raster.pixel_width) / page_width))
}

/// Find the page's background raster.
///
/// The background is the first top-level figure as wide as the page that
/// directly contains an image.
pub fn find_background_raster(page: &PageLayout) -> Option<RasterImage> {
    page.objects.iter().find_map(|object| match object {
        LayoutObject::Figure { width, objects, .. }
            if (width - page.width).abs() <= WIDTH_EPS =>
        {
            objects.iter().find_map(as_raster)
        }
        _ => None,
    })
}

fn as_raster(object: &LayoutObject) -> Option<RasterImage> {
    match object {
        LayoutObject::Image { name, srcsize, .. } => Some(RasterImage {
            name: name.clone(),
            pixel_width: srcsize.0,
            pixel_height: srcsize.1,
        }),
        _ => None,
    }
}
