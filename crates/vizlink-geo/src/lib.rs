//! Boundary geometry for vizlink maps.
//!
//! Loads a static topology once, then projects it for any viewport:
//!
//! - [`Topology`]: the arc-encoded document and its decoder
//! - [`Projection`]: Albers / Albers-with-insets / equirectangular, fitted
//!   to a viewport via [`Atlas::project_to_viewport`]
//! - [`path_for`] / [`centroid_of`]: per-feature path data and label anchor
//! - [`Atlas`]: the immutable, optionally process-wide feature set
//!
//! Region codes are mapped to abbreviations by the tables in [`regions`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atlas;
pub mod error;
pub mod feature;
pub mod path;
pub mod projection;
pub mod regions;
pub mod topology;

pub use atlas::{Atlas, Region};
pub use error::GeoError;
pub use feature::GeoFeature;
pub use path::{centroid_of, path_for};
pub use projection::{Projection, ProjectionKind};
pub use topology::Topology;
