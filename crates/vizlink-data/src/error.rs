//! Error types for dataset loading.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors a [`Loader`](crate::Loader) or the cache can report.
#[derive(Debug)]
pub enum LoadError {
    /// [`DatasetCache::get_or_load`](crate::DatasetCache::get_or_load)
    /// was called before [`init`](crate::DatasetCache::init).
    NotInitialized,
    /// An I/O error occurred while reading the source.
    Io(io::Error),
    /// The source could not be fetched.
    Unavailable {
        /// Where the data was fetched from.
        source: String,
        /// Human-readable description of the failure.
        detail: String,
    },
    /// A record could not be decoded.
    MalformedRecord {
        /// Zero-based index of the offending record.
        index: usize,
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "dataset cache used before init"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Unavailable { source, detail } => {
                write!(f, "could not fetch {source}: {detail}")
            }
            Self::MalformedRecord { index, detail } => {
                write!(f, "malformed record {index}: {detail}")
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
