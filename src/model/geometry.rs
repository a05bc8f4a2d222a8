//! Rectangles, pixel boxes and the per-page scale factor.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A rectangle in layout units, top-left origin (y grows downwards).
///
/// Serialized as `[top, left, bottom, right]`, the order the upstream
/// clustering step emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 4]")]
pub struct Rect {
    /// Top edge
    pub top: f64,
    /// Left edge
    pub left: f64,
    /// Bottom edge
    pub bottom: f64,
    /// Right edge
    pub right: f64,
}

impl Rect {
    /// Create a rectangle from its four edges.
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Build a rectangle from a `[top, left, bottom, right]` slice.
    ///
    /// Anything other than exactly four finite numbers is rejected.
    pub fn from_slice(coords: &[f64]) -> Result<Self> {
        let [top, left, bottom, right] = coords else {
            return Err(Error::MalformedGeometry(format!(
                "expected 4 coordinates (top, left, bottom, right), got {}",
                coords.len()
            )));
        };
        let rect = Self::new(*top, *left, *bottom, *right);
        rect.validate()?;
        Ok(rect)
    }

    /// Check that every coordinate is finite.
    pub fn validate(&self) -> Result<()> {
        if [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|c| c.is_finite())
        {
            Ok(())
        } else {
            Err(Error::MalformedGeometry(format!(
                "non-finite coordinate in {:?}",
                self
            )))
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// Horizontal span as an ordered `(start, end)` pair.
    pub fn x_span(&self) -> (f64, f64) {
        (self.left.min(self.right), self.left.max(self.right))
    }

    /// Vertical span as an ordered `(start, end)` pair.
    pub fn y_span(&self) -> (f64, f64) {
        (self.top.min(self.bottom), self.top.max(self.bottom))
    }

    /// Centre point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Whether a point lies inside the rectangle (edges included).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let (x0, x1) = self.x_span();
        let (y0, y1) = self.y_span();
        x >= x0 && x <= x1 && y >= y0 && y <= y1
    }

    /// Whether `other` lies completely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        let (x0, x1) = self.x_span();
        let (y0, y1) = self.y_span();
        let (ox0, ox1) = other.x_span();
        let (oy0, oy1) = other.y_span();
        ox0 >= x0 && ox1 <= x1 && oy0 >= y0 && oy1 <= y1
    }

    /// Clip this rectangle to `bounds`.
    ///
    /// A rectangle entirely outside `bounds` collapses onto its nearest edge.
    pub fn clip_to(&self, bounds: &Rect) -> Rect {
        let (bx0, bx1) = bounds.x_span();
        let (by0, by1) = bounds.y_span();
        let (x0, x1) = self.x_span();
        let (y0, y1) = self.y_span();
        Rect::new(
            y0.clamp(by0, by1),
            x0.clamp(bx0, bx1),
            y1.clamp(by0, by1),
            x1.clamp(bx0, bx1),
        )
    }

    /// Edge-wise comparison within `eps` layout units.
    pub fn approx_eq(&self, other: &Rect, eps: f64) -> bool {
        (self.top - other.top).abs() <= eps
            && (self.left - other.left).abs() <= eps
            && (self.bottom - other.bottom).abs() <= eps
            && (self.right - other.right).abs() <= eps
    }
}

impl TryFrom<Vec<f64>> for Rect {
    type Error = Error;

    fn try_from(coords: Vec<f64>) -> Result<Self> {
        Rect::from_slice(&coords)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(rect: Rect) -> Self {
        [rect.top, rect.left, rect.bottom, rect.right]
    }
}

/// Relative tolerance for snapping a scaled coordinate to an integer.
const PX_EPSILON: f64 = 1e-9;

/// Ratio converting layout units to raster pixels for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Layout units are emitted as pixels unchanged.
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    /// Wrap a raw ratio.
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw ratio.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Scale a layout coordinate.
    pub fn apply(&self, coord: f64) -> f64 {
        coord * self.0
    }

    /// Scale a layout coordinate and truncate it toward zero.
    ///
    /// Values within rounding error of an integer snap to it, so a page edge
    /// scaled by `pixels / width` lands on the pixel count.
    pub fn to_px(&self, coord: f64) -> i64 {
        let scaled = self.apply(coord);
        let nearest = scaled.round();
        if (scaled - nearest).abs() <= PX_EPSILON * scaled.abs().max(1.0) {
            nearest as i64
        } else {
            scaled.trunc() as i64
        }
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An integer pixel box as written into `title` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BBox {
    /// Left edge in pixels
    pub left: i64,
    /// Top edge in pixels
    pub top: i64,
    /// Right edge in pixels
    pub right: i64,
    /// Bottom edge in pixels
    pub bottom: i64,
}

impl BBox {
    /// Create a pixel box from its edges.
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Scale a layout rectangle into pixels, truncating each edge.
    pub fn from_rect(rect: &Rect, scale: ScaleFactor) -> Result<Self> {
        rect.validate()?;
        Ok(Self::new(
            scale.to_px(rect.left),
            scale.to_px(rect.top),
            scale.to_px(rect.right),
            scale.to_px(rect.bottom),
        ))
    }

    /// Parse the `bbox l t r b` property out of an hOCR `title` attribute.
    ///
    /// Other properties (`; ppageno 0`, ...) are ignored.
    pub fn parse_title(title: &str) -> Result<Self> {
        let caps = bbox_regex()
            .captures(title)
            .ok_or_else(|| Error::MalformedGeometry(format!("no bbox in title {:?}", title)))?;

        let mut edges = [0i64; 4];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = caps[i + 1]
                .parse()
                .map_err(|e| Error::MalformedGeometry(format!("bad bbox value: {}", e)))?;
        }
        let [left, top, right, bottom] = edges;
        Ok(Self::new(left, top, right, bottom))
    }

    /// Whether `other` lies completely inside this box.
    pub fn contains(&self, other: &BBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bbox {} {} {} {}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

fn bbox_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|;)\s*bbox\s+(-?\d+)\s+(-?\d+)\s+(-?\d+)\s+(-?\d+)\s*(?:;|$)")
            .expect("valid bbox regex")
    })
}
