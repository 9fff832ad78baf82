//! Tooltip content and placement.
//!
//! A view shows at most one tooltip, only while the pointer is over one
//! of its marks. Placement puts the box at a fixed offset from the
//! pointer; if that would overflow the view, the box flips to the other
//! side of the pointer on that axis, and is finally clamped into the view.

use vizlink_core::{Datum, FieldRole, Key, Point, Schema};
use vizlink_scale::{format_grouped, Extent};

use crate::config::TooltipConfig;

/// The text lines of a tooltip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TooltipContent {
    header: Vec<String>,
    extra: Vec<String>,
}

impl TooltipContent {
    /// Axis header plus one `name: value` line per attribute field.
    ///
    /// The header holds the x and y values with thousands separators,
    /// titled `x_title`/`y_title` or the field names. Attribute fields
    /// follow in schema order; identity, category, axis, label and hidden
    /// fields are never listed, nor are missing values.
    pub fn for_datum(
        datum: &Datum,
        schema: &Schema,
        x_title: Option<&str>,
        y_title: Option<&str>,
    ) -> Self {
        let title = |id, given: Option<&str>| -> String {
            given
                .map(str::to_string)
                .or_else(|| schema.field(id).map(|f| f.name.clone()))
                .unwrap_or_default()
        };
        let header = vec![
            format!(
                "{}: {}",
                title(schema.x(), x_title),
                format_grouped(datum.number(schema.x()))
            ),
            format!(
                "{}: {}",
                title(schema.y(), y_title),
                format_grouped(datum.number(schema.y()))
            ),
        ];
        let extra = schema
            .fields()
            .iter()
            .zip(datum.values())
            .filter(|(def, value)| def.role == FieldRole::Attribute && !value.is_missing())
            .map(|(def, value)| format!("{}: {value}", def.name))
            .collect();
        Self { header, extra }
    }

    /// A single line of text.
    pub fn text(line: impl Into<String>) -> Self {
        Self {
            header: vec![line.into()],
            extra: Vec::new(),
        }
    }

    /// Fixed header lines.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Additional field lines.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    /// Every line, header first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.header.iter().chain(&self.extra).map(String::as_str)
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.header.len() + self.extra.len()
    }

    /// Estimated box size under `config`.
    pub fn measure(&self, config: &TooltipConfig) -> Extent {
        let widest = self.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (2.0 * config.padding + widest as f64 * config.char_width)
            .clamp(config.min_width, config.max_width);
        let height = 2.0 * config.padding + self.line_count() as f64 * config.line_height;
        Extent::new(width, height)
    }
}

/// Top-left corner of a `size` box for a pointer at `pointer` inside
/// `bounds` (both in view coordinates).
pub fn place(pointer: Point, size: Extent, bounds: Extent, config: &TooltipConfig) -> Point {
    let axis = |p: f64, offset: f64, len: f64, limit: f64| {
        let mut v = p + offset;
        if v + len > limit || v < 0.0 {
            let flipped = p - offset - len;
            if flipped >= 0.0 && flipped + len <= limit {
                v = flipped;
            }
        }
        v.clamp(0.0, (limit - len).max(0.0))
    };
    Point::new(
        axis(pointer.x, config.offset.x, size.width, bounds.width),
        axis(pointer.y, config.offset.y, size.height, bounds.height),
    )
}

#[derive(Clone, Debug, PartialEq)]
struct Shown {
    key: Key,
    category: Key,
    content: TooltipContent,
    size: Extent,
    origin: Point,
}

/// The tooltip of one view: hidden, or shown for one mark.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    shown: Option<Shown>,
}

impl Tooltip {
    /// Show `content` for the mark `key` near `pointer`.
    pub fn show(
        &mut self,
        key: Key,
        category: Key,
        content: TooltipContent,
        pointer: Point,
        bounds: Extent,
        config: &TooltipConfig,
    ) {
        let size = content.measure(config);
        self.shown = Some(Shown {
            key,
            category,
            origin: place(pointer, size, bounds, config),
            content,
            size,
        });
    }

    /// Re-place a visible tooltip for a new pointer position.
    pub fn follow(&mut self, pointer: Point, bounds: Extent, config: &TooltipConfig) {
        if let Some(shown) = &mut self.shown {
            shown.origin = place(pointer, shown.size, bounds, config);
        }
    }

    /// Hide the tooltip.
    pub fn hide(&mut self) {
        self.shown = None;
    }

    /// True while shown.
    pub fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    /// Identity key of the mark the tooltip describes.
    pub fn key(&self) -> Option<&Key> {
        self.shown.as_ref().map(|s| &s.key)
    }

    /// Category of the mark the tooltip describes.
    pub fn category(&self) -> Option<&Key> {
        self.shown.as_ref().map(|s| &s.category)
    }

    /// Current content.
    pub fn content(&self) -> Option<&TooltipContent> {
        self.shown.as_ref().map(|s| &s.content)
    }

    /// Current top-left corner.
    pub fn origin(&self) -> Option<Point> {
        self.shown.as_ref().map(|s| s.origin)
    }

    /// Current estimated size.
    pub fn size(&self) -> Option<Extent> {
        self.shown.as_ref().map(|s| s.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizlink_test_utils::fixtures;

    #[test]
    fn header_holds_axes_and_extras_follow_schema_order() {
        let ds = fixtures::simple(&[("CA", 100.0, 5.0)]);
        let content = TooltipContent::for_datum(&ds.rows()[0], ds.schema(), None, None);
        assert_eq!(content.header(), ["cases: 100", "deaths: 5"]);
        assert_eq!(content.extra(), ["year: 2021"]);
    }

    #[test]
    fn titles_and_grouping() {
        let ds = fixtures::yearly(&[("TX", 2021, 1_234_567.0, 8901.0)]);
        let content = TooltipContent::for_datum(
            &ds.rows()[0],
            ds.schema(),
            Some("Cases (Yearly Aggregate)"),
            Some("Deaths (Yearly Aggregate)"),
        );
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            [
                "Cases (Yearly Aggregate): 1,234,567",
                "Deaths (Yearly Aggregate): 8,901",
                "year: 2021",
            ]
        );
    }

    #[test]
    fn measure_clamps_width() {
        let c = TooltipConfig::default();
        let short = TooltipContent::text("Ohio").measure(&c);
        assert_eq!(short, Extent::new(120.0, 32.0));
        let long = TooltipContent::text("x".repeat(100)).measure(&c);
        assert_eq!(long.width, 240.0);
    }

    #[test]
    fn places_at_offset() {
        let c = TooltipConfig::default();
        let p = place(
            Point::new(100.0, 100.0),
            Extent::new(120.0, 64.0),
            Extent::new(600.0, 400.0),
            &c,
        );
        assert_eq!(p, Point::new(110.0, 90.0));
    }

    #[test]
    fn flips_near_right_and_bottom_edges() {
        let c = TooltipConfig::default();
        let bounds = Extent::new(600.0, 400.0);
        let size = Extent::new(120.0, 64.0);
        assert_eq!(place(Point::new(550.0, 100.0), size, bounds, &c), Point::new(420.0, 90.0));
        assert_eq!(place(Point::new(100.0, 380.0), size, bounds, &c), Point::new(110.0, 326.0));
    }

    #[test]
    fn clamps_when_neither_side_fits() {
        let c = TooltipConfig::default();
        let p = place(Point::new(25.0, 5.0), Extent::new(120.0, 64.0), Extent::new(50.0, 50.0), &c);
        assert_eq!(p, Point::new(0.0, 0.0));
        // Near the top neither side fits: pinned to the top edge.
        let p = place(
            Point::new(100.0, 5.0),
            Extent::new(120.0, 64.0),
            Extent::new(600.0, 400.0),
            &c,
        );
        assert_eq!(p, Point::new(110.0, 0.0));
    }

    #[test]
    fn show_follow_hide() {
        let c = TooltipConfig::default();
        let bounds = Extent::new(600.0, 400.0);
        let mut t = Tooltip::default();
        assert!(!t.is_visible());
        t.show(
            Key::new("CA-2021"),
            Key::new("CA"),
            TooltipContent::text("California"),
            Point::new(10.0, 50.0),
            bounds,
            &c,
        );
        assert_eq!(t.key(), Some(&Key::new("CA-2021")));
        assert_eq!(t.category(), Some(&Key::new("CA")));
        assert_eq!(t.origin(), Some(Point::new(20.0, 40.0)));
        t.follow(Point::new(30.0, 60.0), bounds, &c);
        assert_eq!(t.origin(), Some(Point::new(40.0, 50.0)));
        t.hide();
        assert!(!t.is_visible());
        assert_eq!(t.content(), None);
    }
}
