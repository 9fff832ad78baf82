//! Error types for core data model construction.

use std::error::Error;
use std::fmt;

use crate::datum::FieldRole;

/// Errors detected by [`Schema::new`](crate::Schema::new).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// No fields declared.
    Empty,
    /// A mandatory role has no field.
    MissingRole {
        /// The role without a field.
        role: FieldRole,
    },
    /// A single-valued role was declared twice.
    DuplicateRole {
        /// The repeated role.
        role: FieldRole,
    },
    /// Two fields share a name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "schema declares no fields"),
            Self::MissingRole { role } => write!(f, "schema has no {role} field"),
            Self::DuplicateRole { role } => write!(f, "schema declares more than one {role} field"),
            Self::DuplicateName { name } => write!(f, "field name '{name}' declared twice"),
        }
    }
}

impl Error for SchemaError {}
