//! Core types and traits for the vizlink coordinated-views engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! shared vocabulary of the workspace: identity keys and mark ids, the
//! schema-typed datum model, visual attributes, pointer events, and the
//! traits through which the engine talks to the host rendering substrate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attrs;
pub mod datum;
pub mod error;
pub mod id;
pub mod pointer;
pub mod traits;

pub use attrs::{Color, Filter, Point, Shape, Stroke, VisualAttributes};
pub use datum::{Dataset, Datum, FieldDef, FieldRole, FieldValue, Schema};
pub use error::SchemaError;
pub use id::{FieldId, Key, MarkId, Revision};
pub use pointer::{PointerEvent, PointerKind};
pub use traits::{MarkSink, MarkSpec, PointerHandler};
