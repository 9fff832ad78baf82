//! Chart datasets built from yearly roll-ups, and the year filter.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use vizlink_core::{Dataset, FieldDef, FieldRole, FieldValue, Schema, SchemaError};
use vizlink_geo::regions::abbr_for_name;

use crate::record::{NationalYearlyRecord, StateYearlyRecord};

/// Axis titles (x, y) of the state chart.
pub const STATE_AXIS_TITLES: (&str, &str) =
    ("Cases (Yearly Aggregate)", "Deaths (Yearly Aggregate)");

/// Axis titles (x, y) of the national chart.
pub const NATIONAL_AXIS_TITLES: (&str, &str) = ("Cumulative Cases", "Cumulative Deaths");

/// Field layout of the state chart: `key` (`ABBR-YEAR`), `abbr`
/// (category), `cases` (x), `deaths` (y), `year` (tooltip attribute),
/// `state` and `fips` (hidden).
pub fn state_yearly_schema() -> Result<Arc<Schema>, SchemaError> {
    Ok(Arc::new(Schema::new(vec![
        FieldDef::new("key", FieldRole::Identity),
        FieldDef::new("abbr", FieldRole::Category),
        FieldDef::new("cases", FieldRole::PositionX),
        FieldDef::new("deaths", FieldRole::PositionY),
        FieldDef::new("year", FieldRole::Attribute),
        FieldDef::new("state", FieldRole::Hidden),
        FieldDef::new("fips", FieldRole::Hidden),
    ])?))
}

/// Field layout of the national chart: `year` (identity), `cases` (x),
/// `deaths` (y), `label` (the year as bubble text).
pub fn national_yearly_schema() -> Result<Arc<Schema>, SchemaError> {
    Ok(Arc::new(Schema::new(vec![
        FieldDef::new("year", FieldRole::Identity),
        FieldDef::new("cases", FieldRole::PositionX),
        FieldDef::new("deaths", FieldRole::PositionY),
        FieldDef::new("label", FieldRole::Label),
    ])?))
}

/// Abbreviation of a state name, or the name itself when unknown.
pub fn state_abbr(name: &str) -> &str {
    abbr_for_name(name).unwrap_or(name)
}

/// One bubble per (state, year), colored and linked by abbreviation.
pub fn state_yearly_dataset<'a>(
    rows: impl IntoIterator<Item = &'a StateYearlyRecord>,
) -> Result<Dataset, SchemaError> {
    let mut dataset = Dataset::new(state_yearly_schema()?);
    for row in rows {
        let abbr = state_abbr(&row.state);
        dataset.push([
            FieldValue::from(format!("{abbr}-{}", row.year)),
            abbr.into(),
            (row.cases as f64).into(),
            (row.deaths as f64).into(),
            row.year.into(),
            row.state.as_str().into(),
            row.fips.as_str().into(),
        ]);
    }
    debug!("built state dataset with {} rows", dataset.len());
    Ok(dataset)
}

/// One labeled bubble per year.
pub fn national_yearly_dataset<'a>(
    rows: impl IntoIterator<Item = &'a NationalYearlyRecord>,
) -> Result<Dataset, SchemaError> {
    let mut dataset = Dataset::new(national_yearly_schema()?);
    for row in rows {
        dataset.push([
            FieldValue::from(row.year),
            (row.cases as f64).into(),
            (row.deaths as f64).into(),
            row.year.to_string().into(),
        ]);
    }
    Ok(dataset)
}

/// Which years the state chart shows.
///
/// Every available year starts selected. An empty selection shows all
/// years, but deselecting the last selected year is refused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YearFilter {
    available: BTreeSet<i32>,
    selected: BTreeSet<i32>,
}

impl YearFilter {
    /// A filter over `years` with all of them selected.
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        let available: BTreeSet<i32> = years.into_iter().collect();
        Self {
            selected: available.clone(),
            available,
        }
    }

    /// A filter over the years present in `rows`.
    pub fn from_records(rows: &[StateYearlyRecord]) -> Self {
        Self::new(rows.iter().map(|r| r.year))
    }

    /// Known years, ascending.
    pub fn available(&self) -> impl Iterator<Item = i32> + '_ {
        self.available.iter().copied()
    }

    /// Selected years, ascending.
    pub fn selected(&self) -> impl Iterator<Item = i32> + '_ {
        self.selected.iter().copied()
    }

    /// True if `year` is checked.
    pub fn is_selected(&self, year: i32) -> bool {
        self.selected.contains(&year)
    }

    /// Check or uncheck `year`. Returns whether the selection changed.
    ///
    /// Unknown years cannot be checked, and the last checked year cannot
    /// be unchecked.
    pub fn set(&mut self, year: i32, checked: bool) -> bool {
        if checked {
            self.available.contains(&year) && self.selected.insert(year)
        } else if self.selected.len() > 1 {
            self.selected.remove(&year)
        } else {
            false
        }
    }

    /// True if rows of `year` pass the filter.
    pub fn matches(&self, year: i32) -> bool {
        self.selected.is_empty() || self.selected.contains(&year)
    }

    /// Rows of `rows` that pass the filter, in order.
    pub fn apply<'a>(
        &'a self,
        rows: &'a [StateYearlyRecord],
    ) -> impl Iterator<Item = &'a StateYearlyRecord> + 'a {
        rows.iter().filter(move |r| self.matches(r.year))
    }
}
