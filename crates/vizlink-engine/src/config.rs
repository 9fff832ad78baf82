//! View configuration, validation, and error types.
//!
//! Every view is built from a [`ViewConfig`]; [`ViewConfig::validate`]
//! runs at construction so the render path itself never fails.

use std::error::Error;
use std::fmt;

use vizlink_core::{Color, Point, SchemaError, Stroke};
use vizlink_scale::Extent;

// ── TransitionConfig ───────────────────────────────────────────────

/// Animation durations, in milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Entering marks grow from nothing. Default: 200.
    pub enter_ms: f64,
    /// Marks kept across a dataset update. Default: 200.
    pub update_ms: f64,
    /// Exiting marks dissolve. Default: 400.
    pub exit_ms: f64,
    /// Re-encoding after hover or selection changes. Default: 200.
    pub hover_ms: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enter_ms: 200.0,
            update_ms: 200.0,
            exit_ms: 400.0,
            hover_ms: 200.0,
        }
    }
}

// ── EncodingConfig ─────────────────────────────────────────────────

/// Constants of the encoding policy.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodingConfig {
    /// Radius of unselected marks. Default: 8.
    pub base_radius: f64,
    /// Radius of the selected mark. Default: 12.
    pub large_radius: f64,
    /// Extra radius of the mark under the pointer. Default: 2.
    pub hover_growth: f64,
    /// Opacity of marks outside the active key. Default: 0.15.
    pub dimmed_opacity: f64,
    /// Outline of the selected mark. Default: `#111`, 3 px.
    pub stroke: Stroke,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            base_radius: 8.0,
            large_radius: 12.0,
            hover_growth: 2.0,
            dimmed_opacity: 0.15,
            stroke: Stroke {
                color: Color::rgb(0x11, 0x11, 0x11),
                width: 3.0,
            },
        }
    }
}

// ── Margins ────────────────────────────────────────────────────────

/// Space reserved around the plot area for axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    /// Top margin. Default: 20.
    pub top: f64,
    /// Right margin. Default: 20.
    pub right: f64,
    /// Bottom margin, holds the x axis. Default: 60.
    pub bottom: f64,
    /// Left margin, holds the y axis. Default: 60.
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 60.0,
            left: 60.0,
        }
    }
}

impl Margins {
    /// No margins.
    pub const NONE: Margins = Margins {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// The plot area left inside an outer `width` x `height`.
    pub fn inner(&self, width: f64, height: f64) -> Extent {
        Extent::new(
            width - self.left - self.right,
            height - self.top - self.bottom,
        )
    }

    /// Translate a point from outer view coordinates to plot coordinates.
    pub fn to_plot(&self, p: Point) -> Point {
        Point::new(p.x - self.left, p.y - self.top)
    }
}

// ── TooltipConfig ──────────────────────────────────────────────────

/// Tooltip offset and size estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipConfig {
    /// Offset of the tooltip's corner from the pointer. Default: (10, -10).
    pub offset: Point,
    /// Height of one text line. Default: 16.
    pub line_height: f64,
    /// Average glyph width. Default: 7.
    pub char_width: f64,
    /// Inner padding on every side. Default: 8.
    pub padding: f64,
    /// Minimum box width. Default: 120.
    pub min_width: f64,
    /// Maximum box width. Default: 240.
    pub max_width: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset: Point::new(10.0, -10.0),
            line_height: 16.0,
            char_width: 7.0,
            padding: 8.0,
            min_width: 120.0,
            max_width: 240.0,
        }
    }
}

// ── ViewConfig ─────────────────────────────────────────────────────

/// Everything a view needs besides its data.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Animation durations.
    pub transitions: TransitionConfig,
    /// Encoding policy constants.
    pub encoding: EncodingConfig,
    /// Plot margins.
    pub margins: Margins,
    /// Tooltip layout.
    pub tooltip: TooltipConfig,
    /// Title of the x field in tooltips. Default: the field name.
    pub x_title: Option<String>,
    /// Title of the y field in tooltips. Default: the field name.
    pub y_title: Option<String>,
    /// Vertical offset of bubble labels below the center. Default: 20.
    pub label_dy: f64,
    /// Requested number of axis ticks. Default: 10.
    pub tick_count: usize,
    /// Whether the view reads and writes the dashboard's shared
    /// interaction state. Unlinked views get a private one. Default: true.
    pub linked: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            transitions: TransitionConfig::default(),
            encoding: EncodingConfig::default(),
            margins: Margins::default(),
            tooltip: TooltipConfig::default(),
            x_title: None,
            y_title: None,
            label_dy: 20.0,
            tick_count: 10,
            linked: true,
        }
    }
}

impl ViewConfig {
    /// Bubble chart preset with axis titles.
    pub fn chart(x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        Self {
            x_title: Some(x_title.into()),
            y_title: Some(y_title.into()),
            ..Self::default()
        }
    }

    /// Choropleth preset: no margins, 0.2 dimming, tooltip just above
    /// the pointer, labels on the centroid.
    pub fn map() -> Self {
        Self {
            encoding: EncodingConfig {
                dimmed_opacity: 0.2,
                ..EncodingConfig::default()
            },
            margins: Margins::NONE,
            tooltip: TooltipConfig {
                offset: Point::new(0.0, -10.0),
                ..TooltipConfig::default()
            },
            label_dy: 0.0,
            ..Self::default()
        }
    }

    /// Builder: detach from the shared interaction state.
    pub fn unlinked(mut self) -> Self {
        self.linked = false;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.transitions;
        for (name, value) in [
            ("enter_ms", t.enter_ms),
            ("update_ms", t.update_ms),
            ("exit_ms", t.exit_ms),
            ("hover_ms", t.hover_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }
        if t.exit_ms < t.enter_ms {
            return Err(ConfigError::ExitShorterThanEnter {
                enter_ms: t.enter_ms,
                exit_ms: t.exit_ms,
            });
        }

        let e = &self.encoding;
        for (name, value) in [
            ("base_radius", e.base_radius),
            ("large_radius", e.large_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidRadius { name, value });
            }
        }
        if !e.hover_growth.is_finite() || e.hover_growth < 0.0 {
            return Err(ConfigError::InvalidRadius {
                name: "hover_growth",
                value: e.hover_growth,
            });
        }
        if e.large_radius < e.base_radius {
            return Err(ConfigError::RadiusOrder {
                base: e.base_radius,
                large: e.large_radius,
            });
        }
        if !(0.0..=1.0).contains(&e.dimmed_opacity) {
            return Err(ConfigError::InvalidOpacity {
                value: e.dimmed_opacity,
            });
        }

        let m = &self.margins;
        for (name, value) in [
            ("top", m.top),
            ("right", m.right),
            ("bottom", m.bottom),
            ("left", m.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMargin { name, value });
            }
        }

        let tip = &self.tooltip;
        if !(tip.offset.x.is_finite() && tip.offset.y.is_finite()) {
            return Err(ConfigError::InvalidTooltip {
                reason: "offset must be finite".into(),
            });
        }
        if !(tip.min_width > 0.0 && tip.min_width <= tip.max_width && tip.max_width.is_finite()) {
            return Err(ConfigError::InvalidTooltip {
                reason: format!(
                    "width bounds [{}, {}] must be positive and ordered",
                    tip.min_width, tip.max_width
                ),
            });
        }
        if !(tip.line_height > 0.0 && tip.char_width > 0.0 && tip.padding >= 0.0) {
            return Err(ConfigError::InvalidTooltip {
                reason: "line height and glyph width must be positive".into(),
            });
        }
        if self.tick_count == 0 {
            return Err(ConfigError::NoTicks);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ViewConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A duration is NaN, infinite or negative.
    InvalidDuration {
        /// Which duration.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// Exits must not be faster than entries.
    ExitShorterThanEnter {
        /// Configured entry duration.
        enter_ms: f64,
        /// Configured exit duration.
        exit_ms: f64,
    },
    /// A radius is not finite and positive.
    InvalidRadius {
        /// Which radius.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The selected radius is smaller than the base radius.
    RadiusOrder {
        /// Configured base radius.
        base: f64,
        /// Configured large radius.
        large: f64,
    },
    /// Dimmed opacity outside `[0, 1]`.
    InvalidOpacity {
        /// The invalid value.
        value: f64,
    },
    /// A margin is NaN, infinite or negative.
    InvalidMargin {
        /// Which side.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// Tooltip layout invariant violated.
    InvalidTooltip {
        /// Description of the violated invariant.
        reason: String,
    },
    /// Zero axis ticks requested.
    NoTicks,
    /// The field layout a view builds for itself was rejected.
    Schema(SchemaError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            Self::ExitShorterThanEnter { enter_ms, exit_ms } => {
                write!(f, "exit_ms ({exit_ms}) is shorter than enter_ms ({enter_ms})")
            }
            Self::InvalidRadius { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::RadiusOrder { base, large } => {
                write!(f, "large_radius ({large}) is smaller than base_radius ({base})")
            }
            Self::InvalidOpacity { value } => {
                write!(f, "dimmed_opacity must be in [0, 1], got {value}")
            }
            Self::InvalidMargin { name, value } => {
                write!(f, "{name} margin must be finite and non-negative, got {value}")
            }
            Self::InvalidTooltip { reason } => write!(f, "invalid tooltip config: {reason}"),
            Self::NoTicks => write!(f, "tick_count must be at least 1"),
            Self::Schema(e) => write!(f, "invalid view schema: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for ConfigError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(ViewConfig::default().validate(), Ok(()));
        assert_eq!(ViewConfig::map().validate(), Ok(()));
        assert_eq!(ViewConfig::chart("Cases", "Deaths").validate(), Ok(()));
    }

    #[test]
    fn map_preset_dims_less() {
        assert_eq!(ViewConfig::map().encoding.dimmed_opacity, 0.2);
        assert_eq!(ViewConfig::default().encoding.dimmed_opacity, 0.15);
    }

    #[test]
    fn rejects_negative_duration() {
        let mut c = ViewConfig::default();
        c.transitions.update_ms = -1.0;
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidDuration {
                name: "update_ms",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_fast_exit() {
        let mut c = ViewConfig::default();
        c.transitions.exit_ms = 100.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ExitShorterThanEnter { .. })
        ));
    }

    #[test]
    fn rejects_inverted_radii_and_opacity() {
        let mut c = ViewConfig::default();
        c.encoding.large_radius = 4.0;
        assert!(matches!(c.validate(), Err(ConfigError::RadiusOrder { .. })));

        let mut c = ViewConfig::default();
        c.encoding.dimmed_opacity = 1.5;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidOpacity { .. })));

        let mut c = ViewConfig::default();
        c.encoding.base_radius = f64::NAN;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidRadius { .. })));
    }

    #[test]
    fn rejects_bad_tooltip_and_margins() {
        let mut c = ViewConfig::default();
        c.tooltip.min_width = 300.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidTooltip { .. })));

        let mut c = ViewConfig::default();
        c.margins.left = -5.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidMargin { name: "left", .. })));

        let mut c = ViewConfig::default();
        c.tick_count = 0;
        assert_eq!(c.validate(), Err(ConfigError::NoTicks));
    }

    #[test]
    fn margins_inner_extent() {
        let m = Margins::default();
        assert_eq!(m.inner(600.0, 400.0), Extent::new(520.0, 320.0));
        assert_eq!(m.to_plot(Point::new(60.0, 20.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn error_display() {
        let e = ConfigError::InvalidOpacity { value: 2.0 };
        assert_eq!(e.to_string(), "dimmed_opacity must be in [0, 1], got 2");
    }
}
