//! Canonical categorical color assignment.
//!
//! A [`Palette`] assigns colors by a category's position in a fixed master
//! list, never by the order in which categories appear in a dataset. Two
//! views sharing a palette therefore always agree on a category's color,
//! and a category keeps its color when the dataset is filtered or
//! reordered.

use indexmap::IndexMap;
use vizlink_core::{Color, Key};

/// The 50 US states plus DC, alphabetical by two-letter code.
pub const STATE_CODES: [&str; 51] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL", "IN",
    "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ",
    "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VT", "WA",
    "WI", "WV", "WY",
];

/// Tableau 10 categorical scheme.
pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// ColorBrewer Set2.
pub const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// ColorBrewer Set1.
pub const SET1: [&str; 9] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#999999",
];

/// ColorBrewer Paired.
pub const PAIRED: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];

/// Fixed colors for yearly series, one per year from the first year.
pub const YEAR_COLORS: [&str; 5] = ["#2563eb", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6"];

/// Color of categories outside the master list.
pub const FALLBACK: Color = Color::rgb(0xcc, 0xcc, 0xcc);

/// Read-only table from category key to color.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: IndexMap<Key, Color>,
    fallback: Color,
}

impl Palette {
    /// Assign `scheme[i % scheme.len()]` to the i-th key of `master`.
    ///
    /// Keys repeated in `master` keep their first position. An empty
    /// scheme maps everything to the fallback.
    pub fn new<K: Into<Key>>(master: impl IntoIterator<Item = K>, scheme: &[Color]) -> Self {
        let mut colors = IndexMap::new();
        if !scheme.is_empty() {
            for key in master {
                let next = scheme[colors.len() % scheme.len()];
                colors.entry(key.into()).or_insert(next);
            }
        }
        Self {
            colors,
            fallback: FALLBACK,
        }
    }

    /// Override the color used for unknown keys.
    pub fn with_fallback(mut self, fallback: Color) -> Self {
        self.fallback = fallback;
        self
    }

    /// The state palette: [`STATE_CODES`] over Tableau10, Set2, Set1 and
    /// Paired concatenated, cycling once the schemes run out.
    pub fn us_states() -> Self {
        let scheme: Vec<Color> = TABLEAU10
            .iter()
            .chain(SET2.iter())
            .chain(SET1.iter())
            .chain(PAIRED.iter())
            .filter_map(|hex| Color::from_hex(hex))
            .collect();
        Self::new(STATE_CODES, &scheme)
    }

    /// The yearly palette: [`YEAR_COLORS`] for `first_year` onwards.
    pub fn years(first_year: i32) -> Self {
        let scheme: Vec<Color> = YEAR_COLORS
            .iter()
            .filter_map(|hex| Color::from_hex(hex))
            .collect();
        let years = (0..scheme.len() as i32).map(|i| (first_year + i).to_string());
        Self::new(years, &scheme)
    }

    /// Color of `key`, or the fallback when it is not in the master list.
    pub fn color(&self, key: &str) -> Color {
        self.colors.get(key).copied().unwrap_or(self.fallback)
    }

    /// Position of `key` in the master list.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.colors.get_index_of(key)
    }

    /// True when `key` is in the master list.
    pub fn contains(&self, key: &str) -> bool {
        self.colors.contains_key(key)
    }

    /// The color used for unknown keys.
    pub fn fallback(&self) -> Color {
        self.fallback
    }

    /// Master list entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, Color)> {
        self.colors.iter().map(|(k, c)| (k, *c))
    }

    /// Number of categories in the master list.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the master list is empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
