//! The per-view bundle of scales.

use std::sync::Arc;

use vizlink_core::{Dataset, Point};

use crate::domain::AxisDomain;
use crate::linear::LinearScale;
use crate::palette::Palette;

/// Inner drawing area of a view, margins already removed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Extent {
    /// Construct an extent.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Position scales for both axes plus the shared color palette.
///
/// Recomputed wholesale whenever the dataset or the extent changes.
#[derive(Clone, Debug)]
pub struct ScaleSet {
    /// Horizontal scale, `[0, width]`.
    pub x: LinearScale,
    /// Vertical scale, `[height, 0]`.
    pub y: LinearScale,
    /// Canonical category colors, shared across views.
    pub palette: Arc<Palette>,
}

impl ScaleSet {
    /// Compute scales for `dataset` drawn into `extent`.
    pub fn compute(dataset: &Dataset, extent: Extent, palette: Arc<Palette>) -> Self {
        let schema = dataset.schema();
        let x = AxisDomain::for_field(dataset, schema.x());
        let y = AxisDomain::for_field(dataset, schema.y());
        Self {
            x: LinearScale::horizontal(x, extent.width),
            y: LinearScale::vertical(y, extent.height),
            palette,
        }
    }

    /// Project a data pair to view coordinates.
    pub fn project(&self, x: f64, y: f64) -> Point {
        Point::new(self.x.map(x), self.y.map(y))
    }
}
