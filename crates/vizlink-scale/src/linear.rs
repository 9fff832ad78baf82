//! Linear position scales and tick generation.

use crate::domain::AxisDomain;

/// A linear mapping from a numeric domain to a pixel range.
///
/// Scales are values: they are rebuilt wholesale when the dataset or the
/// viewport changes, never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Map `[domain.0, domain.1]` onto `[range.0, range.1]`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Horizontal axis: domain onto `[0, extent]`.
    pub fn horizontal(domain: AxisDomain, extent: f64) -> Self {
        Self::new((domain.start, domain.end), (0.0, extent))
    }

    /// Vertical axis: domain onto `[extent, 0]` (origin at the bottom).
    pub fn vertical(domain: AxisDomain, extent: f64) -> Self {
        Self::new((domain.start, domain.end), (extent, 0.0))
    }

    /// The input domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// True when the domain has zero width.
    pub fn is_degenerate(&self) -> bool {
        self.domain.0 == self.domain.1
    }

    /// Map a domain value to the range.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range value back to the domain.
    ///
    /// Returns the domain start when either side is degenerate.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 || r0 == r1 {
            return d0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Roughly `count` evenly spaced "nice" values inside the domain.
    ///
    /// Steps are 1, 2 or 5 times a power of ten. Degenerate domains yield
    /// no ticks.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if count == 0 || start == stop || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }
        let Some((i1, i2, inc)) = tick_spec(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }
        let mut ticks: Vec<f64> = (i1 as i64..=i2 as i64)
            .map(|i| {
                let i = i as f64;
                if inc < 0.0 {
                    i / -inc
                } else {
                    i * inc
                }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

/// Rounds half towards positive infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Tick index range and increment. A negative increment encodes a
/// fractional step as its reciprocal to avoid accumulating error.
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * inv);
        i2 = round_half_up(stop * inv);
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = round_half_up(start / step);
        i2 = round_half_up(stop / step);
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_endpoints() {
        let s = LinearScale::horizontal(AxisDomain { start: -5.0, end: 95.0 }, 200.0);
        assert_eq!(s.map(-5.0), 0.0);
        assert_eq!(s.map(95.0), 200.0);
        assert_eq!(s.map(0.0), 10.0);
    }

    #[test]
    fn vertical_is_inverted() {
        let s = LinearScale::vertical(AxisDomain { start: 0.0, end: 10.0 }, 100.0);
        assert_eq!(s.map(0.0), 100.0);
        assert_eq!(s.map(10.0), 0.0);
        assert_eq!(s.invert(25.0), 7.5);
    }

    #[test]
    fn degenerate_maps_to_middle_without_ticks() {
        let s = LinearScale::horizontal(AxisDomain { start: 0.0, end: 0.0 }, 300.0);
        assert!(s.is_degenerate());
        assert_eq!(s.map(42.0), 150.0);
        assert_eq!(s.invert(10.0), 0.0);
        assert!(s.ticks(10).is_empty());
    }

    #[test]
    fn nice_ticks_cover_padded_domain() {
        let s = LinearScale::horizontal(AxisDomain { start: -5.0, end: 100.0 }, 500.0);
        let ticks = s.ticks(10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&100.0));
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn fractional_ticks() {
        let s = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        assert_eq!(s.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn reversed_domain_ticks_descend() {
        let s = LinearScale::new((10.0, 0.0), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks.first(), Some(&10.0));
        assert_eq!(ticks.last(), Some(&0.0));
    }
}
