//! Vizlink: keyed mark reconciliation and cross-view coordination for
//! linked data visualizations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Vizlink sub-crates. For most hosts, adding `vizlink` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use vizlink::prelude::*;
//!
//! // A substrate that draws nothing.
//! struct Blank;
//! impl MarkSink for Blank {
//!     fn create(&mut self, _: MarkId, _: MarkSpec<'_>) {}
//!     fn update_to(&mut self, _: MarkId, _: &VisualAttributes, _: f64) {}
//!     fn destroy(&mut self, _: MarkId) {}
//! }
//!
//! let yearly = vec![StateYearlyRecord {
//!     year: 2021,
//!     state: "Texas".into(),
//!     fips: "48".into(),
//!     cases: 4_300_000,
//!     deaths: 75_000,
//! }];
//!
//! let mut dash = Dashboard::new();
//! let chart = dash.add_view(
//!     ChartView::new(
//!         "states",
//!         ViewConfig::chart("Cases", "Deaths"),
//!         Arc::new(Palette::us_states()),
//!         dash.interaction(),
//!         Blank,
//!     )
//!     .unwrap(),
//! );
//! dash.resize(600.0, 400.0, 0.0);
//! chart
//!     .borrow_mut()
//!     .set_data(state_yearly_dataset(&yearly).unwrap(), 0.0);
//!
//! dash.set_hovered(Some(Key::new("TX")), 10.0);
//! assert_eq!(chart.borrow().reconciler().live_count(), 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vizlink-core` | Keys, datum model, visual attributes, substrate traits |
//! | [`scale`] | `vizlink-scale` | Axis domains, linear scales, palettes, number formats |
//! | [`geo`] | `vizlink-geo` | Topology decoding, projections, region paths |
//! | [`engine`] | `vizlink-engine` | Reconciler, encoding, interaction state, views |
//! | [`data`] | `vizlink-data` | Dataset cache, yearly roll-ups, chart datasets |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Keys, datum model and substrate traits (`vizlink-core`).
///
/// Hosts implement [`types::MarkSink`] to draw marks and feed
/// [`types::PointerEvent`]s back.
pub use vizlink_core as types;

/// Axis domains, scales and palettes (`vizlink-scale`).
pub use vizlink_scale as scale;

/// Topology decoding and projection (`vizlink-geo`).
///
/// [`geo::Atlas`] holds the projected regions a map view draws.
pub use vizlink_geo as geo;

/// Reconciliation, encoding and coordination (`vizlink-engine`).
///
/// [`engine::Dashboard`] links [`engine::ChartView`]s and
/// [`engine::MapView`]s through one shared interaction state.
pub use vizlink_engine as engine;

/// Data pipeline boundary (`vizlink-data`).
pub use vizlink_data as data;

/// Common imports for typical Vizlink usage.
///
/// ```rust
/// use vizlink::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use vizlink_core::{
        Color, Dataset, Datum, FieldDef, FieldRole, FieldValue, Key, MarkId, MarkSink, MarkSpec,
        Point, PointerEvent, PointerKind, Schema, Shape, VisualAttributes,
    };

    // Scales
    pub use vizlink_scale::{Extent, Palette};

    // Geometry
    pub use vizlink_geo::{Atlas, ProjectionKind};

    // Engine
    pub use vizlink_engine::{
        ChartView, Dashboard, InteractionCell, MapView, Reconciler, View, ViewConfig,
    };

    // Data
    pub use vizlink_data::{
        state_yearly, state_yearly_dataset, DatasetCache, Loader, StateDailyRecord,
        StateYearlyRecord, YearFilter,
    };
}
