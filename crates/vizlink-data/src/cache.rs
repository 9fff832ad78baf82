//! Explicit dataset cache with a defined lifecycle.
//!
//! [`DatasetCache`] wraps a [`Loader`] and loads lazily on the first
//! [`get_or_load`](DatasetCache::get_or_load). Later calls share the
//! cached value until [`invalidate`](DatasetCache::invalidate) or a new
//! [`init`](DatasetCache::init) drops it. Failed loads are never cached:
//! the next call retries.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::LoadError;

/// Produces a fresh copy of some source data.
pub trait Loader {
    /// What a load produces.
    type Output;

    /// Fetch and decode the source.
    fn load(&mut self) -> Result<Self::Output, LoadError>;
}

impl<T, F> Loader for F
where
    F: FnMut() -> Result<T, LoadError>,
{
    type Output = T;

    fn load(&mut self) -> Result<T, LoadError> {
        (*self)()
    }
}

/// Lazily loaded, explicitly invalidated data owned by the pipeline.
///
/// # Lifecycle
///
/// - [`new`](Self::new): no loader, nothing cached
/// - [`init`](Self::init): install a loader, dropping any cached value
/// - [`get_or_load`](Self::get_or_load): return the cached value, loading
///   it first if needed
/// - [`invalidate`](Self::invalidate): drop the cached value, keep the
///   loader
pub struct DatasetCache<L: Loader> {
    loader: Option<L>,
    cached: Option<Arc<L::Output>>,
    loads: u64,
}

impl<L: Loader> DatasetCache<L> {
    /// An uninitialized cache.
    pub fn new() -> Self {
        Self {
            loader: None,
            cached: None,
            loads: 0,
        }
    }

    /// A cache initialized with `loader`.
    pub fn with_loader(loader: L) -> Self {
        let mut cache = Self::new();
        cache.init(loader);
        cache
    }

    /// Install `loader`, replacing any previous one and its cached value.
    pub fn init(&mut self, loader: L) {
        self.loader = Some(loader);
        self.cached = None;
    }

    /// Drop the cached value. The next access reloads.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!("dataset cache invalidated");
        }
    }

    /// The cached value, loading it first if needed.
    pub fn get_or_load(&mut self) -> Result<Arc<L::Output>, LoadError> {
        if let Some(value) = &self.cached {
            return Ok(Arc::clone(value));
        }
        let loader = self.loader.as_mut().ok_or(LoadError::NotInitialized)?;
        self.loads += 1;
        match loader.load() {
            Ok(value) => {
                debug!("dataset cache loaded (load #{})", self.loads);
                let value = Arc::new(value);
                self.cached = Some(Arc::clone(&value));
                Ok(value)
            }
            Err(e) => {
                warn!("dataset load failed: {e}");
                Err(e)
            }
        }
    }

    /// The cached value, without loading.
    pub fn cached(&self) -> Option<&Arc<L::Output>> {
        self.cached.as_ref()
    }

    /// True once [`init`](Self::init) has been called.
    pub fn is_initialized(&self) -> bool {
        self.loader.is_some()
    }

    /// Number of load attempts so far, failed ones included.
    pub fn loads(&self) -> u64 {
        self.loads
    }
}

impl<L: Loader> Default for DatasetCache<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Loader> fmt::Debug for DatasetCache<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetCache")
            .field("initialized", &self.loader.is_some())
            .field("cached", &self.cached.is_some())
            .field("loads", &self.loads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(fail_first: bool) -> impl FnMut() -> Result<Vec<u32>, LoadError> {
        let mut calls = 0;
        move || {
            calls += 1;
            if fail_first && calls == 1 {
                Err(LoadError::Unavailable {
                    source: "us-states.csv".into(),
                    detail: "offline".into(),
                })
            } else {
                Ok(vec![calls])
            }
        }
    }

    #[test]
    fn loads_once() {
        let mut cache = DatasetCache::with_loader(counting(false));
        let a = cache.get_or_load().unwrap();
        let b = cache.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, [1]);
        assert_eq!(cache.loads(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let mut cache = DatasetCache::with_loader(counting(false));
        let first = cache.get_or_load().unwrap();
        cache.invalidate();
        assert!(cache.cached().is_none());
        let second = cache.get_or_load().unwrap();
        assert_eq!(*first, [1]);
        assert_eq!(*second, [2]);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = DatasetCache::with_loader(counting(true));
        assert!(matches!(
            cache.get_or_load(),
            Err(LoadError::Unavailable { .. })
        ));
        assert!(cache.cached().is_none());
        assert_eq!(*cache.get_or_load().unwrap(), [2]);
        assert_eq!(cache.loads(), 2);
    }

    #[test]
    fn uninitialized_cache_reports_error() {
        let mut cache: DatasetCache<fn() -> Result<u8, LoadError>> = DatasetCache::new();
        assert!(!cache.is_initialized());
        assert!(matches!(cache.get_or_load(), Err(LoadError::NotInitialized)));
        assert_eq!(cache.loads(), 0);
    }

    #[test]
    fn init_replaces_loader_and_value() {
        fn one() -> Result<u8, LoadError> {
            Ok(1)
        }
        fn two() -> Result<u8, LoadError> {
            Ok(2)
        }
        let mut cache: DatasetCache<fn() -> Result<u8, LoadError>> = DatasetCache::new();
        cache.init(one);
        assert_eq!(*cache.get_or_load().unwrap(), 1);
        cache.init(two);
        assert!(cache.cached().is_none());
        assert_eq!(*cache.get_or_load().unwrap(), 2);
    }
}
