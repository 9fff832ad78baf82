//! Data pipeline for vizlink dashboards.
//!
//! Source rows are cumulative daily reports. [`record`] rolls them up to
//! one row per year, [`dataset`] turns the roll-ups into chart datasets
//! and filters them by year, and [`cache`] holds the loaded source
//! behind an explicit init/invalidate lifecycle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod dataset;
pub mod error;
pub mod record;

pub use cache::{DatasetCache, Loader};
pub use dataset::{
    national_yearly_dataset, national_yearly_schema, state_abbr, state_yearly_dataset,
    state_yearly_schema, YearFilter, NATIONAL_AXIS_TITLES, STATE_AXIS_TITLES,
};
pub use error::LoadError;
pub use record::{
    latest_day, national_yearly, state_yearly, NationalDailyRecord, NationalYearlyRecord,
    StateDailyRecord, StateYearlyRecord,
};
