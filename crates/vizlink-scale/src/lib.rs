//! Domain, scale and palette computation for vizlink views.
//!
//! Derives encoding ranges from a dataset:
//!
//! - [`AxisDomain`]: zero-anchored, padded numeric domain of one field
//! - [`LinearScale`]: domain → pixel mapping with "nice" tick generation
//! - [`Palette`]: order-stable category → color assignment
//! - [`ScaleSet`]: the per-view bundle recomputed on every dataset change
//!
//! plus tooltip and tick number formatting in [`format`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod format;
pub mod linear;
pub mod palette;
pub mod scale_set;

pub use domain::AxisDomain;
pub use format::{format_grouped, format_si};
pub use linear::LinearScale;
pub use palette::Palette;
pub use scale_set::{Extent, ScaleSet};
