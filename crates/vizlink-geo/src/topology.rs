//! Topology document model and arc decoding.
//!
//! A topology stores shared boundary segments ("arcs") once; geometries
//! reference arcs by index, with `!i` (one's complement) meaning arc `i`
//! traversed in reverse. When a `transform` is present, arc points are
//! quantized and delta-encoded: each point is an offset from the previous
//! one, and `scale`/`translate` map the integer grid back to degrees.

use std::collections::BTreeMap;

use geo::{coord, Coord, LineString, MultiPolygon, Polygon};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GeoError;
use crate::feature::GeoFeature;

/// Quantization transform.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Transform {
    /// Per-axis scale.
    pub scale: [f64; 2],
    /// Per-axis translation.
    pub translate: [f64; 2],
}

/// A region code that may be encoded as a string or a number.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GeometryId {
    /// String id, e.g. `"06"`.
    Text(String),
    /// Numeric id, e.g. `6`.
    Number(i64),
}

impl GeometryId {
    /// The id as a string. Numeric ids are zero-padded to two digits,
    /// matching the two-digit region codes the lookup tables use.
    pub fn to_code(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n:02}"),
        }
    }
}

/// One geometry within a collection.
#[derive(Clone, Debug, Deserialize)]
pub struct GeometryObject {
    /// Geometry type (`Polygon`, `MultiPolygon`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Arc references, shape depends on `kind`.
    #[serde(default)]
    pub arcs: Value,
    /// Region code.
    #[serde(default)]
    pub id: Option<GeometryId>,
    /// Free-form properties; `name` is used.
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

/// A named geometry collection.
#[derive(Clone, Debug, Deserialize)]
pub struct GeometryCollection {
    /// Collection type, normally `GeometryCollection`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Member geometries.
    #[serde(default)]
    pub geometries: Vec<GeometryObject>,
}

/// A topology document.
#[derive(Clone, Debug, Deserialize)]
pub struct Topology {
    /// Must be `"Topology"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional quantization transform.
    #[serde(default)]
    pub transform: Option<Transform>,
    /// Named geometry collections.
    pub objects: BTreeMap<String, GeometryCollection>,
    /// Shared arcs.
    pub arcs: Vec<Vec<Vec<f64>>>,
}

impl Topology {
    /// Parse a topology document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, GeoError> {
        let topology: Topology = serde_json::from_str(json)?;
        if topology.kind != "Topology" {
            return Err(GeoError::NotATopology {
                found: topology.kind,
            });
        }
        Ok(topology)
    }

    /// Decode every polygonal geometry of collection `object`.
    ///
    /// Geometries that are not `Polygon`/`MultiPolygon`, or that reference
    /// arcs out of range, are skipped with a warning.
    pub fn features(&self, object: &str) -> Result<Vec<GeoFeature>, GeoError> {
        let collection = self
            .objects
            .get(object)
            .ok_or_else(|| GeoError::MissingObject {
                name: object.to_string(),
            })?;
        let arcs = self.decode_arcs();
        let mut out = Vec::with_capacity(collection.geometries.len());
        for geometry in &collection.geometries {
            let id = geometry.id.as_ref().map(GeometryId::to_code).unwrap_or_default();
            match decode_geometry(geometry, &arcs) {
                Some(decoded) => out.push(GeoFeature {
                    name: geometry
                        .properties
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    id,
                    geometry: decoded,
                }),
                None => warn!(
                    "skipping geometry '{id}' of type {} in '{object}': undecodable arcs",
                    geometry.kind
                ),
            }
        }
        Ok(out)
    }

    /// Decode every arc to absolute positions.
    fn decode_arcs(&self) -> Vec<Vec<Coord<f64>>> {
        self.arcs
            .iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| match &self.transform {
                        Some(t) => {
                            x += p[0];
                            y += p[1];
                            coord! {
                                x: x * t.scale[0] + t.translate[0],
                                y: y * t.scale[1] + t.translate[1],
                            }
                        }
                        None => coord! { x: p[0], y: p[1] },
                    })
                    .collect()
            })
            .collect()
    }
}

fn decode_geometry(
    geometry: &GeometryObject,
    arcs: &[Vec<Coord<f64>>],
) -> Option<MultiPolygon<f64>> {
    match geometry.kind.as_str() {
        "Polygon" => {
            let rings: Vec<Vec<i64>> = serde_json::from_value(geometry.arcs.clone()).ok()?;
            Some(MultiPolygon::new(vec![decode_polygon(&rings, arcs)?]))
        }
        "MultiPolygon" => {
            let polys: Vec<Vec<Vec<i64>>> = serde_json::from_value(geometry.arcs.clone()).ok()?;
            polys
                .iter()
                .map(|p| decode_polygon(p, arcs))
                .collect::<Option<Vec<_>>>()
                .map(MultiPolygon::new)
        }
        _ => None,
    }
}

/// The first ring is the exterior, the rest are holes.
fn decode_polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Option<Polygon<f64>> {
    let mut rings = rings
        .iter()
        .map(|r| decode_ring(r, arcs))
        .collect::<Option<Vec<_>>>()?
        .into_iter();
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Some(Polygon::new(exterior, rings.collect()))
}

/// Stitch arcs into a ring. Consecutive arcs share an endpoint, which is
/// kept once. Rings are padded to four points by repeating the first.
fn decode_ring(refs: &[i64], arcs: &[Vec<Coord<f64>>]) -> Option<LineString<f64>> {
    let mut ring: Vec<Coord<f64>> = Vec::new();
    for &r in refs {
        let (index, reversed) = if r < 0 { (!r, true) } else { (r, false) };
        let arc = arcs.get(usize::try_from(index).ok()?)?;
        ring.pop();
        let start = ring.len();
        ring.extend_from_slice(arc);
        if reversed {
            ring[start..].reverse();
        }
    }
    if let Some(&first) = ring.first() {
        while ring.len() < 4 {
            ring.push(first);
        }
    }
    Some(LineString::new(ring))
}
