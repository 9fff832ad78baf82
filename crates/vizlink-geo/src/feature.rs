//! Decoded region geometry.

use geo::{LineString, MultiPolygon};

/// One administrative region, decoded from the topology.
///
/// Immutable after load. Projection-dependent data (path, centroid) is
/// derived on demand so it can be recomputed for any viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFeature {
    /// Region code from the topology (e.g. a FIPS code such as `"06"`).
    pub id: String,
    /// Human-readable name from `properties.name`, empty if absent.
    pub name: String,
    /// Boundary in geographic coordinates: x is longitude, y latitude.
    pub geometry: MultiPolygon<f64>,
}

impl GeoFeature {
    /// Iterate every ring of every polygon, exteriors before holes.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.geometry
            .0
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
    }

    /// Total number of positions across all rings.
    pub fn vertex_count(&self) -> usize {
        self.rings().map(|r| r.0.len()).sum()
    }
}
