//! Visual attribute types and their interpolation.

use std::fmt;
use std::sync::Arc;

/// A point in view coordinates (pixels, origin top-left).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `to`.
    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Construct a color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`. Returns `None` for anything else.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        match digits.as_slice() {
            [r, g, b] => Some(Self::rgb(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => {
                Some(Self::rgb(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0))
            }
            _ => None,
        }
    }

    /// Channel-wise RGB interpolation towards `to`.
    pub fn lerp(self, to: Color, t: f64) -> Color {
        let ch = |a: u8, b: u8| lerp(f64::from(a), f64::from(b), t).round().clamp(0.0, 255.0) as u8;
        Color::rgb(ch(self.r, to.r), ch(self.g, to.g), ch(self.b, to.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Outline drawn around a mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Outline color.
    pub color: Color,
    /// Outline width in pixels.
    pub width: f64,
}

/// Emphasis filter applied to a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Soft drop shadow / glow around the mark.
    Glow,
}

/// Geometry of a mark, fixed at creation and replaced on re-layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A circle centered on the mark position.
    Circle,
    /// A pre-projected path in SVG path syntax.
    Path(Arc<str>),
}

/// Everything the substrate needs to draw one mark at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualAttributes {
    /// Mark center (circles) or label anchor (paths).
    pub position: Point,
    /// Circle radius. Ignored for paths.
    pub radius: f64,
    /// Fill color.
    pub fill: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Outline, if any.
    pub stroke: Option<Stroke>,
    /// Emphasis filter, if any.
    pub filter: Option<Filter>,
}

impl VisualAttributes {
    /// Interpolate towards `to` at `t ∈ [0, 1]`.
    ///
    /// Continuous attributes are interpolated. Stroke and filter are
    /// discrete: they take the target value as soon as `t > 0`.
    pub fn lerp(&self, to: &VisualAttributes, t: f64) -> VisualAttributes {
        let t = t.clamp(0.0, 1.0);
        let (stroke, filter) = if t > 0.0 {
            (to.stroke, to.filter)
        } else {
            (self.stroke, self.filter)
        };
        VisualAttributes {
            position: self.position.lerp(to.position, t),
            radius: lerp(self.radius, to.radius, t),
            fill: self.fill.lerp(to.fill, t),
            opacity: lerp(self.opacity, to.opacity, t),
            stroke,
            filter,
        }
    }

    /// The same attributes collapsed to radius 0 and opacity 0.
    pub fn collapsed(&self) -> VisualAttributes {
        VisualAttributes {
            radius: 0.0,
            opacity: 0.0,
            ..self.clone()
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(radius: f64, opacity: f64) -> VisualAttributes {
        VisualAttributes {
            position: Point::new(0.0, 0.0),
            radius,
            fill: Color::rgb(0, 0, 0),
            opacity,
            stroke: None,
            filter: None,
        }
    }

    #[test]
    fn hex_round_trip() {
        let c = Color::from_hex("#4e79a7").unwrap();
        assert_eq!(c, Color::rgb(0x4e, 0x79, 0xa7));
        assert_eq!(c.to_string(), "#4e79a7");
        assert_eq!(Color::from_hex("#ccc"), Some(Color::rgb(204, 204, 204)));
        assert_eq!(Color::from_hex("4e79a7"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn color_lerp_midpoint() {
        let c = Color::rgb(0, 0, 0).lerp(Color::rgb(200, 100, 50), 0.5);
        assert_eq!(c, Color::rgb(100, 50, 25));
    }

    #[test]
    fn attrs_lerp_endpoints() {
        let a = attrs(0.0, 0.0);
        let mut b = attrs(8.0, 1.0);
        b.filter = Some(Filter::Glow);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.radius, 4.0);
        assert_eq!(mid.opacity, 0.5);
        assert_eq!(mid.filter, Some(Filter::Glow));
    }

    #[test]
    fn collapsed_keeps_position_and_fill() {
        let mut a = attrs(8.0, 1.0);
        a.position = Point::new(3.0, 4.0);
        let c = a.collapsed();
        assert_eq!(c.radius, 0.0);
        assert_eq!(c.opacity, 0.0);
        assert_eq!(c.position, a.position);
    }
}
