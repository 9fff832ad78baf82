//! Keyed reconciliation and cross-view coordination for vizlink.
//!
//! Turns datasets into animated, keyed mark sets and keeps every view of
//! a dashboard in step with one shared hover/selection state:
//!
//! - [`Reconciler`]: enter/update/exit diffing with cancellable exits
//! - [`encode`]: the pure (datum, scales, interaction) → attributes policy
//! - [`InteractionCell`]: the shared, observable hover/selection state
//! - [`Tooltip`]: per-view tooltip content and placement
//! - [`ChartView`] / [`MapView`]: bubble chart and choropleth views
//! - [`Dashboard`]: routes pointer events and re-syncs linked views
//!
//! Everything runs on the host's event loop. Time is passed in
//! explicitly as milliseconds from the host's frame clock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod encoding;
pub mod interaction;
pub mod map;
pub mod metrics;
pub mod reconcile;
pub mod tooltip;
pub mod transition;
pub mod view;

pub use chart::ChartView;
pub use config::{
    ConfigError, EncodingConfig, Margins, TooltipConfig, TransitionConfig, ViewConfig,
};
pub use dashboard::Dashboard;
pub use encoding::{emphasis, encode, pointer_feedback, Emphasis};
pub use interaction::{Change, InteractionCell, InteractionState, Slot, SubscriptionId};
pub use map::{preset_size, MapView};
pub use metrics::ReconcileMetrics;
pub use reconcile::{Mark, MarkEncoder, Phase, Reconciler};
pub use tooltip::{place, Tooltip, TooltipContent};
pub use transition::{ease_cubic_in_out, Transition};
pub use view::{axis_ticks, Tick, View};
