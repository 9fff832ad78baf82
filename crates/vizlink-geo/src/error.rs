//! Error types for topology loading.

use std::fmt;

/// Errors arising from loading a boundary topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// The document is not valid JSON or does not match the topology shape.
    Parse {
        /// Parser message.
        reason: String,
    },
    /// The document's `type` is not `"Topology"`.
    NotATopology {
        /// The `type` found instead.
        found: String,
    },
    /// The requested geometry collection does not exist.
    MissingObject {
        /// Name of the requested collection.
        name: String,
    },
    /// A process-wide atlas was already installed.
    AlreadyLoaded,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { reason } => write!(f, "topology parse error: {reason}"),
            Self::NotATopology { found } => {
                write!(f, "expected a Topology document, found type '{found}'")
            }
            Self::MissingObject { name } => {
                write!(f, "topology has no geometry collection '{name}'")
            }
            Self::AlreadyLoaded => write!(f, "atlas already loaded"),
        }
    }
}

impl std::error::Error for GeoError {}

impl From<serde_json::Error> for GeoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse {
            reason: e.to_string(),
        }
    }
}
