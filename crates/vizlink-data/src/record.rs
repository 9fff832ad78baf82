//! Source records and their yearly roll-ups.
//!
//! The daily series are cumulative, so the figure for a year is the
//! latest row dated within it.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::debug;

/// One cumulative daily row for one state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDailyRecord {
    /// Reporting date.
    pub date: NaiveDate,
    /// Full state name.
    pub state: String,
    /// Two-digit FIPS code.
    pub fips: String,
    /// Cumulative cases.
    pub cases: u64,
    /// Cumulative deaths.
    pub deaths: u64,
}

/// One cumulative daily row for the whole country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NationalDailyRecord {
    /// Reporting date.
    pub date: NaiveDate,
    /// Cumulative cases.
    pub cases: u64,
    /// Cumulative deaths.
    pub deaths: u64,
}

/// Year-end figures of one state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateYearlyRecord {
    /// Calendar year.
    pub year: i32,
    /// Full state name.
    pub state: String,
    /// Two-digit FIPS code.
    pub fips: String,
    /// Cumulative cases at the last report of the year.
    pub cases: u64,
    /// Cumulative deaths at the last report of the year.
    pub deaths: u64,
}

/// Year-end figures of the whole country.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NationalYearlyRecord {
    /// Calendar year.
    pub year: i32,
    /// Cumulative cases at the last report of the year.
    pub cases: u64,
    /// Cumulative deaths at the last report of the year.
    pub deaths: u64,
}

/// Latest row per (year, state), sorted by year then state name.
///
/// Of several rows sharing the latest date, the first one wins.
pub fn state_yearly(daily: &[StateDailyRecord]) -> Vec<StateYearlyRecord> {
    let mut latest: BTreeMap<(i32, &str), &StateDailyRecord> = BTreeMap::new();
    for row in daily {
        latest
            .entry((row.date.year(), row.state.as_str()))
            .and_modify(|kept| {
                if row.date > kept.date {
                    *kept = row;
                }
            })
            .or_insert(row);
    }
    debug!(
        "rolled {} state rows into {} yearly rows",
        daily.len(),
        latest.len()
    );
    latest
        .into_iter()
        .map(|((year, _), row)| StateYearlyRecord {
            year,
            state: row.state.clone(),
            fips: row.fips.clone(),
            cases: row.cases,
            deaths: row.deaths,
        })
        .collect()
}

/// Latest row per year, sorted by year.
pub fn national_yearly(daily: &[NationalDailyRecord]) -> Vec<NationalYearlyRecord> {
    let mut latest: BTreeMap<i32, &NationalDailyRecord> = BTreeMap::new();
    for row in daily {
        latest
            .entry(row.date.year())
            .and_modify(|kept| {
                if row.date > kept.date {
                    *kept = row;
                }
            })
            .or_insert(row);
    }
    latest
        .into_iter()
        .map(|(year, row)| NationalYearlyRecord {
            year,
            cases: row.cases,
            deaths: row.deaths,
        })
        .collect()
}

/// Rows of the most recent reporting date, in input order.
pub fn latest_day(daily: &[StateDailyRecord]) -> Vec<&StateDailyRecord> {
    let Some(last) = daily.iter().map(|r| r.date).max() else {
        return Vec::new();
    };
    daily.iter().filter(|r| r.date == last).collect()
}
