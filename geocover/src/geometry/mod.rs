//! Geometry model for covering queries.
//!
//! Provides the geographic point and polygon value types consumed by the
//! cell indexes, plus the unit-sphere vector math the hierarchical index
//! evaluates its predicates with.

mod vector;

pub use vector::{edges_cross, Vec3};

use crate::error::{CoverError, Result};

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LNG: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LNG: f64 = 180.0;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Create a point, validating range and finiteness.
    ///
    /// # Errors
    ///
    /// Returns `CoverError::InvalidCoordinate` if either component is not
    /// finite or lies outside [-90, 90] / [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite()
            || !lng.is_finite()
            || !(MIN_LAT..=MAX_LAT).contains(&lat)
            || !(MIN_LNG..=MAX_LNG).contains(&lng)
        {
            return Err(CoverError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Create a point from a GeoJSON position (`[lng, lat, ...]`).
    pub fn from_position(position: &[f64]) -> Result<Self> {
        match position {
            [lng, lat, ..] => Self::new(*lat, *lng),
            _ => Err(CoverError::InvalidGeometry(format!(
                "position needs at least 2 values, got {}",
                position.len()
            ))),
        }
    }

    /// Convert a vector on (or near) the unit sphere to a point.
    pub fn from_vec3(v: &Vec3) -> Self {
        let lat = v.z.atan2((v.x * v.x + v.y * v.y).sqrt()).to_degrees();
        let lng = v.y.atan2(v.x).to_degrees();
        Self { lat, lng }
    }

    /// Create a point from degrees computed by the engine, clamping into the
    /// valid range.
    pub(crate) fn clamped(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.clamp(MIN_LAT, MAX_LAT),
            lng: lng.clamp(MIN_LNG, MAX_LNG),
        }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Unit vector for this point.
    pub fn to_vec3(&self) -> Vec3 {
        let (lat, lng) = (self.lat.to_radians(), self.lng.to_radians());
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lng.cos(), cos_lat * lng.sin(), lat.sin())
    }

    /// `[lat, lng]`, the pair order used by the cell responses.
    pub fn to_lat_lng_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    /// `[lng, lat]`, the GeoJSON position order.
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.lng, self.lat]
    }

    fn approx_eq(&self, other: &LatLng) -> bool {
        (self.lat - other.lat).abs() < 1e-12 && (self.lng - other.lng).abs() < 1e-12
    }
}

/// Axis-aligned bounds in latitude/longitude degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Returns true if the point lies inside or on the box.
    pub fn contains(&self, point: &LatLng) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat())
            && (self.min_lng..=self.max_lng).contains(&point.lng())
    }
}

/// A polygon given by a single implicitly closed ring.
///
/// Self-intersection is not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<LatLng>,
}

impl Polygon {
    /// Create a polygon from its ring.
    ///
    /// Consecutive duplicate vertices and the closing vertex (when it repeats
    /// the first one) are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CoverError::InvalidGeometry` if fewer than 3 distinct
    /// vertices remain.
    pub fn new(points: Vec<LatLng>) -> Result<Self> {
        let mut vertices: Vec<LatLng> = Vec::with_capacity(points.len());
        for point in points {
            if vertices.last().is_some_and(|last| last.approx_eq(&point)) {
                continue;
            }
            vertices.push(point);
        }
        while vertices.len() > 1 && vertices[0].approx_eq(&vertices[vertices.len() - 1]) {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(CoverError::InvalidGeometry(format!(
                "polygon ring needs at least 3 distinct vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Create a polygon from a ring of GeoJSON positions (`[lng, lat]`).
    pub fn from_positions(ring: &[Vec<f64>]) -> Result<Self> {
        let points = ring
            .iter()
            .map(|p| LatLng::from_position(p))
            .collect::<Result<Vec<_>>>()?;
        Self::new(points)
    }

    /// Ring vertices, without the closing duplicate.
    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    /// Latitude/longitude bounds of the vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lng: f64::INFINITY,
            max_lng: f64::NEG_INFINITY,
        };
        for v in &self.vertices {
            bbox.min_lat = bbox.min_lat.min(v.lat());
            bbox.max_lat = bbox.max_lat.max(v.lat());
            bbox.min_lng = bbox.min_lng.min(v.lng());
            bbox.max_lng = bbox.max_lng.max(v.lng());
        }
        bbox
    }

    /// Even-odd containment test treating edges as straight lines in the
    /// longitude/latitude plane.
    pub fn contains_planar(&self, point: &LatLng) -> bool {
        let (x, y) = (point.lng(), point.lat());
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.vertices[i].lng(), self.vertices[i].lat());
            let (xj, yj) = (self.vertices[j].lng(), self.vertices[j].lat());
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            LatLng::new(0.0, 0.0).unwrap(),
            LatLng::new(0.0, 1.0).unwrap(),
            LatLng::new(1.0, 1.0).unwrap(),
            LatLng::new(1.0, 0.0).unwrap(),
            LatLng::new(0.0, 0.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_latlng_rejects_out_of_range() {
        assert!(matches!(
            LatLng::new(91.0, 0.0),
            Err(CoverError::InvalidCoordinate { .. })
        ));
        assert!(LatLng::new(0.0, -180.5).is_err());
        assert!(LatLng::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_position_swaps_order() {
        let p = LatLng::from_position(&[-122.4194, 37.7749]).unwrap();
        assert_eq!(p.lat(), 37.7749);
        assert_eq!(p.lng(), -122.4194);
    }

    #[test]
    fn test_from_position_too_short() {
        assert!(matches!(
            LatLng::from_position(&[1.0]),
            Err(CoverError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_vec3_roundtrip() {
        let p = LatLng::new(51.5074, -0.1278).unwrap();
        let back = LatLng::from_vec3(&p.to_vec3());
        assert!((back.lat() - p.lat()).abs() < 1e-12);
        assert!((back.lng() - p.lng()).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_drops_closing_vertex() {
        assert_eq!(square().vertices().len(), 4);
    }

    #[test]
    fn test_polygon_needs_three_distinct_vertices() {
        let result = Polygon::new(vec![
            LatLng::new(0.0, 0.0).unwrap(),
            LatLng::new(1.0, 1.0).unwrap(),
            LatLng::new(0.0, 0.0).unwrap(),
        ]);
        assert!(matches!(result, Err(CoverError::InvalidGeometry(_))));
    }

    #[test]
    fn test_bounding_box() {
        let bbox = square().bounding_box();
        assert_eq!(bbox.min_lat, 0.0);
        assert_eq!(bbox.max_lat, 1.0);
        assert_eq!(bbox.min_lng, 0.0);
        assert_eq!(bbox.max_lng, 1.0);
        assert!(bbox.contains(&LatLng::new(0.5, 0.5).unwrap()));
    }

    #[test]
    fn test_contains_planar() {
        let poly = square();
        assert!(poly.contains_planar(&LatLng::new(0.5, 0.5).unwrap()));
        assert!(!poly.contains_planar(&LatLng::new(1.5, 0.5).unwrap()));
        assert!(!poly.contains_planar(&LatLng::new(0.5, -0.5).unwrap()));
    }
}
