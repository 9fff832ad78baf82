//! Reusable dataset and topology fixtures.
//!
//! - [`simple_schema`] / [`simple`]: one mark per state, `year` as the
//!   only tooltip attribute.
//! - [`yearly_schema`] / [`yearly`]: one mark per (state, year), keyed
//!   `ABBR-YEAR` with the abbreviation as category.
//! - [`TOPOLOGY`]: three regions (California, Texas and a code with no
//!   abbreviation) as an unquantized topology document.

use std::sync::Arc;

use vizlink_core::{Dataset, FieldDef, FieldRole, FieldValue, Schema};

/// `abbr` (identity), `cases` (x), `deaths` (y), `year` (attribute).
pub fn simple_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(vec![
            FieldDef::new("abbr", FieldRole::Identity),
            FieldDef::new("cases", FieldRole::PositionX),
            FieldDef::new("deaths", FieldRole::PositionY),
            FieldDef::new("year", FieldRole::Attribute),
        ])
        .expect("fixture schema"),
    )
}

/// Rows of `(abbr, cases, deaths)`, all in 2021.
pub fn simple(rows: &[(&str, f64, f64)]) -> Dataset {
    let mut ds = Dataset::new(simple_schema());
    for &(abbr, cases, deaths) in rows {
        ds.push([
            FieldValue::from(abbr),
            cases.into(),
            deaths.into(),
            2021.into(),
        ]);
    }
    ds
}

/// `key` (identity), `abbr` (category), `cases`, `deaths`, `year`
/// (attribute), `state` (hidden).
pub fn yearly_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(vec![
            FieldDef::new("key", FieldRole::Identity),
            FieldDef::new("abbr", FieldRole::Category),
            FieldDef::new("cases", FieldRole::PositionX),
            FieldDef::new("deaths", FieldRole::PositionY),
            FieldDef::new("year", FieldRole::Attribute),
            FieldDef::new("state", FieldRole::Hidden),
        ])
        .expect("fixture schema"),
    )
}

/// Rows of `(abbr, year, cases, deaths)`.
pub fn yearly(rows: &[(&str, i32, f64, f64)]) -> Dataset {
    let mut ds = Dataset::new(yearly_schema());
    for &(abbr, year, cases, deaths) in rows {
        ds.push([
            FieldValue::from(format!("{abbr}-{year}")),
            abbr.into(),
            cases.into(),
            deaths.into(),
            year.into(),
            FieldValue::from(format!("state {abbr}")),
        ]);
    }
    ds
}

/// Three square regions in the `states` collection: `06` California,
/// `48` Texas and `72` (no abbreviation in the lookup table).
pub const TOPOLOGY: &str = r#"{
    "type": "Topology",
    "objects": {
        "states": {
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Polygon", "arcs": [[0]], "id": "06", "properties": {"name": "California"}},
                {"type": "Polygon", "arcs": [[1]], "id": "48", "properties": {"name": "Texas"}},
                {"type": "MultiPolygon", "arcs": [[[2]]], "id": "72", "properties": {"name": "Puerto Rico"}}
            ]
        }
    },
    "arcs": [
        [[-124, 34], [-118, 34], [-118, 40], [-124, 40], [-124, 34]],
        [[-106, 26], [-94, 26], [-94, 36], [-106, 36], [-106, 26]],
        [[-67, 18], [-65.5, 18], [-65.5, 18.5], [-67, 18.5], [-67, 18]]
    ]
}"#;
