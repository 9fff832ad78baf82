//! Projected path strings and centroids.

use std::fmt::Write;
use std::sync::Arc;

use geo::Centroid;
use vizlink_core::Point;

use crate::feature::GeoFeature;
use crate::projection::Projection;

/// SVG path data for `feature` under `projection`.
///
/// One `M…L…Z` subpath per ring, coordinates rounded to three decimals.
/// Features without rings produce an empty path.
pub fn path_for(feature: &GeoFeature, projection: &Projection) -> Arc<str> {
    let mut d = String::new();
    for polygon in &projection.project_geometry(&feature.geometry) {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for (i, p) in ring.coords().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                // Writing to a String cannot fail.
                let _ = write!(d, "{cmd}{},{}", Coord(p.x), Coord(p.y));
            }
            if !ring.0.is_empty() {
                d.push('Z');
            }
        }
    }
    Arc::from(d)
}

/// Planar centroid of the projected feature, used for label placement.
///
/// Area-weighted over all polygons (holes subtract). Degenerate
/// geometry falls back to the centroid of its outline, and an empty
/// feature to the origin.
pub fn centroid_of(feature: &GeoFeature, projection: &Projection) -> Point {
    projection
        .project_geometry(&feature.geometry)
        .centroid()
        .map_or_else(Point::default, |c| Point::new(c.x(), c.y()))
}

/// Compact number display: up to three decimals, trailing zeros trimmed.
struct Coord(f64);

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = (self.0 * 1000.0).round() / 1000.0;
        let s = format!("{v:.3}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        f.write_str(if s == "-0" { "0" } else { s })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon, Polygon};

    use crate::projection::ProjectionKind;

    fn unit_square() -> GeoFeature {
        feature(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ])
    }

    fn feature(polygon: Polygon<f64>) -> GeoFeature {
        GeoFeature {
            id: "sq".into(),
            name: String::new(),
            geometry: MultiPolygon::new(vec![polygon]),
        }
    }

    /// Equirectangular with a scale that maps one degree to 10 px.
    fn ten_px_per_degree() -> Projection {
        Projection::new(
            ProjectionKind::Equirectangular,
            10.0 / 1f64.to_radians(),
            Point::new(0.0, 100.0),
        )
    }

    #[test]
    fn path_has_one_subpath_per_ring() {
        let d = path_for(&unit_square(), &ten_px_per_degree());
        assert_eq!(&*d, "M0,100L10,100L10,90L0,90L0,100Z");
    }

    #[test]
    fn centroid_is_area_weighted() {
        let c = centroid_of(&unit_square(), &ten_px_per_degree());
        assert!((c.x - 5.0).abs() < 1e-9);
        assert!((c.y - 95.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_centroid_falls_back_to_outline() {
        let sliver = feature(polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 0.0, y: 0.0),
        ]);
        let c = centroid_of(&sliver, &ten_px_per_degree());
        assert!((c.x - 10.0).abs() < 1e-9);
        assert!((c.y - 100.0).abs() < 1e-9);

        let empty = GeoFeature {
            id: "e".into(),
            name: String::new(),
            geometry: MultiPolygon::new(vec![]),
        };
        assert_eq!(centroid_of(&empty, &ten_px_per_degree()), Point::default());
        assert_eq!(&*path_for(&empty, &ten_px_per_degree()), "");
    }

    #[test]
    fn holes_get_their_own_subpath() {
        let framed = feature(polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 4.0, y: 0.0),
                (x: 4.0, y: 4.0),
                (x: 0.0, y: 4.0),
            ],
            interiors: [
                [
                    (x: 1.0, y: 1.0),
                    (x: 3.0, y: 1.0),
                    (x: 3.0, y: 3.0),
                    (x: 1.0, y: 3.0),
                ],
            ],
        ));
        let d = path_for(&framed, &ten_px_per_degree());
        assert_eq!(d.matches('M').count(), 2);
        let c = centroid_of(&framed, &ten_px_per_degree());
        assert!((c.x - 20.0).abs() < 1e-9);
        assert!((c.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn coordinates_are_trimmed() {
        assert_eq!(Coord(1.5).to_string(), "1.5");
        assert_eq!(Coord(2.0).to_string(), "2");
        assert_eq!(Coord(-0.0001).to_string(), "0");
        assert_eq!(Coord(3.14159).to_string(), "3.142");
    }
}
