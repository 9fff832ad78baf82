//! Map projections fitted to a viewport.
//!
//! Every projection is expressed as a fixed "unit" mapping (scale 1,
//! translate 0) followed by `screen = unit * scale + translate`. Fitting to
//! a viewport therefore only needs the bounds of the unit-projected
//! geometry, and re-projection for a new size is a cheap recomputation of
//! two numbers.

use geo::{coord, BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use vizlink_core::Point;

use crate::feature::GeoFeature;

/// Which unit projection to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProjectionKind {
    /// Albers equal-area conic for the contiguous United States.
    Albers,
    /// Albers composite: contiguous states, with Alaska and Hawaii drawn
    /// as scaled insets below the south-west corner.
    #[default]
    AlbersUsa,
    /// Plate carrée: longitude and latitude used directly.
    Equirectangular,
}

/// A projection fitted to a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: Point,
}

impl Projection {
    /// A projection with explicit scale and translate.
    pub fn new(kind: ProjectionKind, scale: f64, translate: Point) -> Self {
        Self {
            kind,
            scale,
            translate,
        }
    }

    /// Fit `features` into `[0, width] x [0, height]`, centered.
    ///
    /// With no drawable geometry the projection is centered with scale 1.
    pub fn fit(kind: ProjectionKind, features: &[GeoFeature], width: f64, height: f64) -> Self {
        let unit = Self::new(kind, 1.0, Point::default());
        let bounds = features
            .iter()
            .filter_map(|f| unit.project_geometry(&f.geometry).bounding_rect())
            .filter(is_finite)
            .reduce(union);
        let Some(bounds) = bounds.filter(|b| b.width() > 0.0 && b.height() > 0.0) else {
            return Self::new(kind, 1.0, Point::new(width / 2.0, height / 2.0));
        };
        let (min, max) = (bounds.min(), bounds.max());
        let k = (width / bounds.width()).min(height / bounds.height());
        let tx = (width - k * (max.x + min.x)) / 2.0;
        let ty = (height - k * (max.y + min.y)) / 2.0;
        Self::new(kind, k, Point::new(tx, ty))
    }

    /// The unit projection in use.
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Translation.
    pub fn translate(&self) -> Point {
        self.translate
    }

    /// Project one `(longitude, latitude)` position.
    pub fn project(&self, p: Coord<f64>) -> Point {
        let inset = Inset::for_position(self.kind, p);
        self.to_screen(inset.unit(p))
    }

    /// Project a whole region into screen space.
    pub fn project_geometry(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.0.iter().map(|p| self.project_polygon(p)).collect()
    }

    /// Project a polygon. All of its rings use the inset chosen by the
    /// first exterior point, so a polygon is never split across insets.
    pub fn project_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        let Some(&first) = polygon.exterior().0.first() else {
            return Polygon::new(LineString::new(Vec::new()), Vec::new());
        };
        let inset = Inset::for_position(self.kind, first);
        let ring = |r: &LineString<f64>| -> LineString<f64> {
            r.coords()
                .map(|&c| {
                    let p = self.to_screen(inset.unit(c));
                    coord! { x: p.x, y: p.y }
                })
                .collect()
        };
        Polygon::new(
            ring(polygon.exterior()),
            polygon.interiors().iter().map(ring).collect(),
        )
    }

    fn to_screen(&self, unit: Point) -> Point {
        Point::new(
            unit.x * self.scale + self.translate.x,
            unit.y * self.scale + self.translate.y,
        )
    }
}

fn is_finite(r: &Rect<f64>) -> bool {
    let (min, max) = (r.min(), r.max());
    min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

/// Albers equal-area conic with its own rotation, center, relative scale
/// and offset. Scale and offset are relative to the contiguous-states
/// projection, so the insets keep their placement at any fitted scale.
#[derive(Clone, Copy, Debug)]
struct Conic {
    n: f64,
    c: f64,
    r0: f64,
    rotate: f64,
    center: Point,
    scale: f64,
    offset: Point,
}

impl Conic {
    fn new(
        parallels: (f64, f64),
        rotate: f64,
        center: (f64, f64),
        scale: f64,
        offset: Point,
    ) -> Self {
        let sy0 = parallels.0.to_radians().sin();
        let n = (sy0 + parallels.1.to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let r0 = c.sqrt() / n;
        let mut conic = Self {
            n,
            c,
            r0,
            rotate,
            center: Point::default(),
            scale,
            offset,
        };
        conic.center = conic.raw(center.0.to_radians(), center.1.to_radians());
        conic
    }

    fn lower48() -> Self {
        Self::new((29.5, 45.5), 96.0, (-0.6, 38.7), 1.0, Point::default())
    }

    fn alaska() -> Self {
        Self::new(
            (55.0, 65.0),
            154.0,
            (-2.0, 58.5),
            0.35,
            Point::new(-0.307, 0.201),
        )
    }

    fn hawaii() -> Self {
        Self::new((8.0, 18.0), 157.0, (-3.0, 19.9), 1.0, Point::new(-0.205, 0.212))
    }

    /// Raw conic projection of already-rotated radians.
    fn raw(&self, lambda: f64, phi: f64) -> Point {
        let r = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let x = lambda * self.n;
        Point::new(r * x.sin(), self.r0 - r * x.cos())
    }

    /// Unit-space projection: screen y grows downwards.
    fn unit(&self, p: Coord<f64>) -> Point {
        let lambda = wrap_degrees(p.x + self.rotate).to_radians();
        let raw = self.raw(lambda, p.y.to_radians());
        let k = self.scale;
        Point::new(
            (raw.x - self.center.x) * k + self.offset.x,
            (self.center.y - raw.y) * k + self.offset.y,
        )
    }
}

fn wrap_degrees(d: f64) -> f64 {
    let w = (d + 180.0).rem_euclid(360.0) - 180.0;
    if w == -180.0 && d > 0.0 {
        180.0
    } else {
        w
    }
}

/// The sub-projection a position is routed to.
#[derive(Clone, Copy, Debug)]
enum Inset {
    Conic(Conic),
    Equirectangular,
}

impl Inset {
    fn for_position(kind: ProjectionKind, p: Coord<f64>) -> Self {
        match kind {
            ProjectionKind::Albers => Self::Conic(Conic::lower48()),
            ProjectionKind::AlbersUsa => {
                let (lon, lat) = (p.x, p.y);
                if lat >= 50.0 && (lon <= -129.0 || lon >= 170.0) {
                    Self::Conic(Conic::alaska())
                } else if lat < 30.0 && lon <= -150.0 {
                    Self::Conic(Conic::hawaii())
                } else {
                    Self::Conic(Conic::lower48())
                }
            }
            ProjectionKind::Equirectangular => Self::Equirectangular,
        }
    }

    fn unit(&self, p: Coord<f64>) -> Point {
        match self {
            Self::Conic(c) => c.unit(p),
            Self::Equirectangular => Point::new(p.x.to_radians(), -p.y.to_radians()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, Rect};

    fn square(id: &str, lon: f64, lat: f64, size: f64) -> GeoFeature {
        let rect = Rect::new(coord! { x: lon, y: lat }, coord! { x: lon + size, y: lat + size });
        GeoFeature {
            id: id.into(),
            name: id.into(),
            geometry: MultiPolygon::new(vec![rect.to_polygon()]),
        }
    }

    fn at(lon: f64, lat: f64) -> Coord<f64> {
        coord! { x: lon, y: lat }
    }

    fn projected(p: &Projection, fs: &[GeoFeature]) -> Vec<Coord<f64>> {
        fs.iter()
            .flat_map(|f| p.project_geometry(&f.geometry))
            .flat_map(|poly| poly.exterior().0.clone())
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn equirectangular_fit_fills_limiting_axis() {
        let f = square("a", -100.0, 30.0, 10.0);
        let p = Projection::fit(ProjectionKind::Equirectangular, &[f], 200.0, 100.0);
        // Square geometry in a 2:1 viewport: height limits, centered horizontally.
        let top_left = p.project(at(-100.0, 40.0));
        let bottom_right = p.project(at(-90.0, 30.0));
        assert_close(top_left.y, 0.0);
        assert_close(bottom_right.y, 100.0);
        assert_close(top_left.x, 50.0);
        assert_close(bottom_right.x, 150.0);
    }

    #[test]
    fn refit_is_idempotent() {
        let fs = vec![square("a", -100.0, 30.0, 10.0), square("b", -80.0, 35.0, 5.0)];
        let a = Projection::fit(ProjectionKind::AlbersUsa, &fs, 600.0, 380.0);
        let b = Projection::fit(ProjectionKind::AlbersUsa, &fs, 600.0, 380.0);
        assert_eq!(a, b);
        let c = Projection::fit(ProjectionKind::AlbersUsa, &fs, 900.0, 570.0);
        assert_close(c.scale() / a.scale(), 1.5);
    }

    #[test]
    fn albers_keeps_fitted_geometry_inside_viewport() {
        let fs = vec![square("a", -120.0, 30.0, 8.0), square("b", -75.0, 40.0, 4.0)];
        let p = Projection::fit(ProjectionKind::Albers, &fs, 600.0, 380.0);
        for q in projected(&p, &fs) {
            assert!(q.x >= -1e-6 && q.x <= 600.0 + 1e-6, "x {}", q.x);
            assert!(q.y >= -1e-6 && q.y <= 380.0 + 1e-6, "y {}", q.y);
        }
    }

    #[test]
    fn albers_north_is_up() {
        let p = Projection::new(ProjectionKind::Albers, 1000.0, Point::default());
        let south = p.project(at(-96.0, 30.0));
        let north = p.project(at(-96.0, 45.0));
        assert!(north.y < south.y);
        let west = p.project(at(-110.0, 38.0));
        let east = p.project(at(-80.0, 38.0));
        assert!(west.x < east.x);
    }

    #[test]
    fn insets_route_alaska_and_hawaii() {
        let fs = vec![
            square("lower", -100.0, 35.0, 5.0),
            square("ak", -150.0, 60.0, 5.0),
            square("hi", -157.0, 20.0, 1.0),
        ];
        let p = Projection::fit(ProjectionKind::AlbersUsa, &fs, 960.0, 600.0);
        let lower = p.project(at(-100.0, 35.0));
        let ak = p.project(at(-150.0, 60.0));
        let hi = p.project(at(-157.0, 20.0));
        // Both insets sit to the left of and below the contiguous states.
        assert!(ak.x < lower.x && ak.y > lower.y - 1.0);
        assert!(hi.x < lower.x && hi.y > lower.y);
    }

    #[test]
    fn empty_fit_is_centered() {
        let p = Projection::fit(ProjectionKind::AlbersUsa, &[], 600.0, 380.0);
        assert_eq!(p.translate(), Point::new(300.0, 190.0));
    }

    #[test]
    fn wraps_longitudes() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(0.0), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fitted_geometry_stays_in_viewport(
                lon in -124.0f64..-70.0,
                lat in 25.0f64..48.0,
                size in 0.5f64..5.0,
                w in 50.0f64..1200.0,
                h in 50.0f64..800.0,
            ) {
                let fs = vec![square("a", lon, lat, size), square("b", -100.0, 35.0, 2.0)];
                let p = Projection::fit(ProjectionKind::AlbersUsa, &fs, w, h);
                for q in projected(&p, &fs) {
                    prop_assert!(q.x >= -1e-6 && q.x <= w + 1e-6);
                    prop_assert!(q.y >= -1e-6 && q.y <= h + 1e-6);
                }
            }
        }
    }
}
