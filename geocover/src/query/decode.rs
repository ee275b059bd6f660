//! GeoJSON decoding into the geometry model.

use geojson::{GeoJson, Geometry, Value};
use tracing::debug;

use crate::error::{CoverError, Result};
use crate::geometry::{LatLng, Polygon};

/// A decoded input geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Point(LatLng),
    /// One entry per ring: the outer ring first, then any holes.
    Polygon(Vec<Polygon>),
    /// A geometry kind the engine does not cover, by GeoJSON type name.
    Unsupported(String),
}

impl Feature {
    fn from_geometry(geometry: &Geometry) -> Result<Self> {
        match &geometry.value {
            Value::Point(position) => Ok(Feature::Point(LatLng::from_position(position)?)),
            Value::Polygon(rings) => {
                let polygons = rings
                    .iter()
                    .map(|ring| Polygon::from_positions(ring))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Feature::Polygon(polygons))
            }
            other => Ok(Feature::Unsupported(kind_name(other).to_string())),
        }
    }
}

/// Decode a FeatureCollection, a single Feature or a bare Geometry.
///
/// Features without a geometry are dropped.
///
/// # Errors
///
/// - `Decode` if the input is not valid GeoJSON.
/// - `InvalidCoordinate` / `InvalidGeometry` for unusable points or rings.
pub fn decode_geojson(input: &str) -> Result<Vec<Feature>> {
    let document: GeoJson = input
        .parse()
        .map_err(|e: geojson::Error| CoverError::Decode(e.to_string()))?;

    let geometries: Vec<&Geometry> = match &document {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .collect(),
    };

    let features = geometries
        .into_iter()
        .map(Feature::from_geometry)
        .collect::<Result<Vec<_>>>()?;
    debug!(features = features.len(), "Decoded GeoJSON");
    Ok(features)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
