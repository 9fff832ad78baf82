//! Axis domain computation.

use vizlink_core::{Dataset, FieldId};

/// Input range of one positional axis.
///
/// `end` is the maximum value (0 for an empty dataset) and `start` is
/// `min(0, minimum) - PADDING * max`, so the axis always includes zero and
/// leaves a little room below it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisDomain {
    /// Lower bound (padded).
    pub start: f64,
    /// Upper bound.
    pub end: f64,
}

impl AxisDomain {
    /// Fraction of the maximum used as padding below the minimum.
    pub const PADDING: f64 = 0.05;

    /// Compute a domain from already-coerced values.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut max: Option<f64> = None;
        let mut min: Option<f64> = None;
        for v in values {
            max = Some(max.map_or(v, |m| m.max(v)));
            min = Some(min.map_or(v, |m| m.min(v)));
        }
        let max = max.unwrap_or(0.0);
        let min = min.unwrap_or(0.0).min(0.0);
        Self {
            start: min - Self::PADDING * max,
            end: max,
        }
    }

    /// Compute the domain of one numeric field of a dataset.
    ///
    /// Missing or non-numeric values count as 0.
    pub fn for_field(dataset: &Dataset, field: FieldId) -> Self {
        Self::from_values(dataset.iter().map(|d| d.number(field)))
    }

    /// True when the domain has zero width (e.g. an empty dataset).
    ///
    /// Callers suppress axis ticks for degenerate domains.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Width of the domain.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}
