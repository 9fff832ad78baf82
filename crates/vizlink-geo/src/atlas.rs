//! The loaded boundary set and its per-viewport layout.

use std::sync::{Arc, OnceLock};

use vizlink_core::{Key, Point};

use crate::error::GeoError;
use crate::feature::GeoFeature;
use crate::path::{centroid_of, path_for};
use crate::projection::{Projection, ProjectionKind};
use crate::regions::abbr_for_fips;
use crate::topology::Topology;

static GLOBAL: OnceLock<Atlas> = OnceLock::new();

/// An immutable set of region features decoded from a topology.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Atlas {
    features: Vec<GeoFeature>,
}

/// One region laid out for a specific viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Mark key: the abbreviation, or the raw region code when unknown.
    pub key: Key,
    /// Label text: the abbreviation, empty when the code is unknown.
    pub label: &'static str,
    /// Display name from the topology.
    pub name: String,
    /// Projected path data.
    pub path: Arc<str>,
    /// Projected centroid.
    pub centroid: Point,
}

impl Atlas {
    /// Decode collection `object` of a topology document.
    pub fn from_json(json: &str, object: &str) -> Result<Self, GeoError> {
        let topology = Topology::from_json(json)?;
        Ok(Self::from_features(topology.features(object)?))
    }

    /// Wrap already-decoded features.
    pub fn from_features(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    /// Install `self` as the process-wide atlas.
    ///
    /// Fails with [`GeoError::AlreadyLoaded`] if one is installed.
    pub fn install(self) -> Result<&'static Atlas, GeoError> {
        GLOBAL.set(self).map_err(|_| GeoError::AlreadyLoaded)?;
        GLOBAL.get().ok_or(GeoError::AlreadyLoaded)
    }

    /// The process-wide atlas, loading it from `json` on first use.
    ///
    /// Later calls return the installed atlas without parsing.
    pub fn load_global(json: &str, object: &str) -> Result<&'static Atlas, GeoError> {
        if let Some(atlas) = GLOBAL.get() {
            return Ok(atlas);
        }
        let atlas = Self::from_json(json, object)?;
        Ok(GLOBAL.get_or_init(|| atlas))
    }

    /// The process-wide atlas, if installed.
    pub fn global() -> Option<&'static Atlas> {
        GLOBAL.get()
    }

    /// Decoded features in topology order.
    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    /// Fit a projection of `kind` to a `width` x `height` viewport.
    pub fn project_to_viewport(
        &self,
        kind: ProjectionKind,
        width: f64,
        height: f64,
    ) -> Projection {
        Projection::fit(kind, &self.features, width, height)
    }

    /// Lay out every feature under `projection`.
    pub fn regions(&self, projection: &Projection) -> Vec<Region> {
        self.features
            .iter()
            .map(|f| {
                let abbr = abbr_for_fips(&f.id);
                Region {
                    key: Key::new(abbr.unwrap_or(&f.id)),
                    label: abbr.unwrap_or(""),
                    name: f.name.clone(),
                    path: path_for(f, projection),
                    centroid: centroid_of(f, projection),
                }
            })
            .collect()
    }
}
