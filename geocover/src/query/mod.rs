//! Query orchestration: decoded features in, response documents out.
//!
//! Each entry point here serves one HTTP route (and one CLI command). The
//! functions are pure and synchronous; callers on an async runtime run them
//! on the blocking pool.

mod decode;
mod params;

pub use decode::{decode_geojson, Feature};
pub use params::{CoverParams, FormFields, HexParams, IntersectParams};

use serde::Serialize;
use tracing::{debug, info};

use crate::cell::CellId;
use crate::covering::{
    cover_cap, cover_point, cover_polygon, Covering, DEFAULT_MAX_POLYGON_CELLS,
};
use crate::error::Result;
use crate::geometry::LatLng;
use crate::hex::{compact, polyfill};
use crate::region::DEFAULT_EARTH_RADIUS_KM;

/// Default cell budget for circle coverings.
pub const DEFAULT_MAX_CAP_CELLS: usize = 300;

/// Engine settings, fixed at start-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub earth_radius_km: f64,
    pub max_cap_cells: usize,
    /// Limit on the cells of one polygon covering or hexagon fill.
    pub max_polygon_cells: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: DEFAULT_EARTH_RADIUS_KM,
            max_cap_cells: DEFAULT_MAX_CAP_CELLS,
            max_polygon_cells: DEFAULT_MAX_POLYGON_CELLS,
        }
    }
}

/// Corners of one cell as `[lat, lng]` pairs.
pub type CellVertices = Vec<[f64; 2]>;

/// Response of a hierarchical covering request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverResponse {
    pub max_level_geojson: u8,
    /// Comma-joined cell tokens.
    pub cell_tokens: String,
    pub cells: Vec<CellVertices>,
}

/// Response of a hexagonal covering request.
#[derive(Debug, Clone, Serialize)]
pub struct HexResponse {
    pub hexagons_geojson: ::geojson::FeatureCollection,
}

/// Response of an intersection request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectResponse {
    pub intersects_with_point: bool,
    pub intersects_with_circle: bool,
    /// Circle radius in metres, echoed back.
    pub radius: f64,
    /// Cells of the circle covering.
    pub cells: Vec<CellVertices>,
}

fn vertex_pairs(vertices: &[LatLng; 4]) -> CellVertices {
    vertices.iter().map(LatLng::to_lat_lng_pair).collect()
}

/// Cover every polygon ring and point of the input.
///
/// Outer rings and holes are covered independently. Other geometry kinds
/// are skipped.
pub fn cover_geojson(
    features: &[Feature],
    params: &CoverParams,
    config: &EngineConfig,
) -> Result<CoverResponse> {
    let mut tokens: Vec<String> = Vec::new();
    let mut cells: Vec<CellVertices> = Vec::new();

    for feature in features {
        match feature {
            Feature::Polygon(rings) => {
                for ring in rings {
                    let result = cover_polygon(
                        ring,
                        params.max_level,
                        params.min_level,
                        config.max_polygon_cells,
                    )?;
                    tokens.extend(result.tokens);
                    cells.extend(result.vertex_sets.iter().map(vertex_pairs));
                }
            }
            Feature::Point(point) => {
                let result = cover_point(point, params.max_level)?;
                tokens.push(result.token());
                cells.push(vertex_pairs(&result.vertices));
            }
            Feature::Unsupported(kind) => debug!(kind = %kind, "Skipping unsupported geometry"),
        }
    }

    info!(
        features = features.len(),
        cells = cells.len(),
        max_level = params.max_level,
        min_level = params.min_level,
        "Cover request completed"
    );
    Ok(CoverResponse {
        max_level_geojson: params.max_level,
        cell_tokens: tokens.join(","),
        cells,
    })
}

/// Fill every polygon ring with hexagons at `resolution` and compact them.
///
/// Each compacted cell becomes one Polygon feature with a closed
/// `[lng, lat]` ring. Non-polygon geometries are skipped.
pub fn cover_hex_geojson(
    features: &[Feature],
    resolution: u8,
    config: &EngineConfig,
) -> Result<HexResponse> {
    let mut out = Vec::new();

    for feature in features {
        let Feature::Polygon(rings) = feature else {
            debug!(?feature, "Skipping non-polygon geometry");
            continue;
        };
        for ring in rings {
            let filled = polyfill(ring, resolution, config.max_polygon_cells)?;
            let mut compacted: Vec<_> = compact(&filled)?.into_iter().collect();
            compacted.sort();

            for cell in compacted {
                let mut positions: Vec<Vec<f64>> =
                    cell.boundary().iter().map(LatLng::to_position).collect();
                if let Some(first) = positions.first().cloned() {
                    positions.push(first);
                }
                out.push(::geojson::Feature {
                    bbox: None,
                    geometry: Some(::geojson::Geometry::new(::geojson::Value::Polygon(vec![
                        positions,
                    ]))),
                    id: None,
                    properties: None,
                    foreign_members: None,
                });
            }
        }
    }

    info!(
        features = features.len(),
        hexagons = out.len(),
        resolution,
        "Hexagon request completed"
    );
    Ok(HexResponse {
        hexagons_geojson: ::geojson::FeatureCollection {
            bbox: None,
            features: out,
            foreign_members: None,
        },
    })
}

/// Test the input against a point and a circle around it.
///
/// The point is represented by its cell at `max_level_geojson`; the circle
/// by a budgeted covering at `max_level_circle`. A polygon ring matches the
/// point if its covering intersects that cell and matches the circle if its
/// covering intersects the circle covering. A point feature is represented
/// by its own cell at `max_level_geojson`.
pub fn check_intersection(
    features: &[Feature],
    params: &IntersectParams,
    config: &EngineConfig,
) -> Result<IntersectResponse> {
    let center = LatLng::new(params.lat, params.lng)?;
    let circle = cover_cap(
        &center,
        params.radius,
        params.max_level_circle,
        config.max_cap_cells,
        config.earth_radius_km,
    )?;
    let target = CellId::from_lat_lng(&center, params.max_level)?;

    let mut with_point = false;
    let mut with_circle = false;
    for feature in features {
        match feature {
            Feature::Polygon(rings) => {
                for ring in rings {
                    let covering = cover_polygon(
                        ring,
                        params.max_level,
                        params.min_level,
                        config.max_polygon_cells,
                    )?
                    .covering;
                    with_point |= covering.intersects_cell(target);
                    with_circle |= covering.intersects(&circle);
                }
            }
            Feature::Point(point) => {
                let cell = cover_point(point, params.max_level)?.cell;
                with_point |= cell.intersects(&target);
                with_circle |= circle.intersects_cell(cell);
            }
            Feature::Unsupported(kind) => debug!(kind = %kind, "Skipping unsupported geometry"),
        }
    }

    info!(
        lat = params.lat,
        lng = params.lng,
        radius = params.radius,
        circle_cells = circle.len(),
        intersects_with_point = with_point,
        intersects_with_circle = with_circle,
        "Intersection request completed"
    );
    Ok(IntersectResponse {
        intersects_with_point: with_point,
        intersects_with_circle: with_circle,
        radius: params.radius,
        cells: circle_cells(&circle),
    })
}

fn circle_cells(circle: &Covering) -> Vec<CellVertices> {
    circle.vertex_sets().iter().map(vertex_pairs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoverError;

    const SQUARE: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon",
         "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}
    ]}"#;

    fn cover_params(max_level: u8, min_level: u8) -> CoverParams {
        CoverParams {
            geojson: SQUARE.to_string(),
            max_level,
            min_level,
        }
    }

    fn intersect_params(lat: f64, lng: f64, radius: f64) -> IntersectParams {
        IntersectParams {
            geojson: SQUARE.to_string(),
            lat,
            lng,
            radius,
            max_level: 10,
            min_level: 5,
            max_level_circle: 12,
        }
    }

    #[test]
    fn test_cover_square() {
        let features = decode_geojson(SQUARE).unwrap();
        let params = cover_params(10, 5);
        let response = cover_geojson(&features, &params, &EngineConfig::default()).unwrap();
        assert_eq!(response.max_level_geojson, 10);
        let tokens: Vec<&str> = response.cell_tokens.split(',').collect();
        assert!(!tokens.is_empty());
        assert_eq!(tokens.len(), response.cells.len());
        for cell in &response.cells {
            assert_eq!(cell.len(), 4);
        }
    }

    #[test]
    fn test_cover_point() {
        let features =
            decode_geojson(r#"{"type": "Point", "coordinates": [-122.4194, 37.7749]}"#).unwrap();
        let params = cover_params(15, 15);
        let response = cover_geojson(&features, &params, &EngineConfig::default()).unwrap();
        assert!(!response.cell_tokens.contains(','));
        assert_eq!(response.cells.len(), 1);
        let id = CellId::from_token(&response.cell_tokens).unwrap();
        assert_eq!(id.level(), 15);
    }

    #[test]
    fn test_cover_skips_unsupported() {
        let features =
            decode_geojson(r#"{"type": "LineString", "coordinates": [[0,0],[1,1]]}"#).unwrap();
        let params = cover_params(10, 5);
        let response = cover_geojson(&features, &params, &EngineConfig::default()).unwrap();
        assert_eq!(response.cell_tokens, "");
        assert!(response.cells.is_empty());
    }

    #[test]
    fn test_cover_level_range_error() {
        let features = decode_geojson(SQUARE).unwrap();
        assert!(matches!(
            cover_geojson(&features, &cover_params(5, 10), &EngineConfig::default()),
            Err(CoverError::InvalidLevelRange { .. })
        ));
    }

    #[test]
    fn test_hex_features_are_closed_rings() {
        let features = decode_geojson(SQUARE).unwrap();
        let response = cover_hex_geojson(&features, 5, &EngineConfig::default()).unwrap();
        let collection = &response.hexagons_geojson;
        assert!(!collection.features.is_empty());
        for feature in &collection.features {
            match feature.geometry.as_ref().map(|g| &g.value) {
                Some(::geojson::Value::Polygon(rings)) => {
                    assert_eq!(rings.len(), 1);
                    assert_eq!(rings[0].len(), 7);
                    assert_eq!(rings[0][0], rings[0][6]);
                }
                other => panic!("expected polygon, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_circle_inside_polygon_intersects() {
        let features = decode_geojson(SQUARE).unwrap();
        let params = intersect_params(0.5, 0.5, 1000.0);
        let response = check_intersection(&features, &params, &EngineConfig::default()).unwrap();
        assert!(response.intersects_with_point);
        assert!(response.intersects_with_circle);
        assert_eq!(response.radius, 1000.0);
        assert!(!response.cells.is_empty());
        assert!(response.cells.len() <= DEFAULT_MAX_CAP_CELLS);
    }

    #[test]
    fn test_far_circle_does_not_intersect() {
        let features = decode_geojson(SQUARE).unwrap();
        let params = intersect_params(45.0, 45.0, 1000.0);
        let response = check_intersection(&features, &params, &EngineConfig::default()).unwrap();
        assert!(!response.intersects_with_point);
        assert!(!response.intersects_with_circle);
    }

    #[test]
    fn test_point_feature_intersection() {
        let features =
            decode_geojson(r#"{"type": "Point", "coordinates": [10.0, 20.0]}"#).unwrap();
        let params = IntersectParams {
            geojson: String::new(),
            lat: 20.0,
            lng: 10.0,
            radius: 500.0,
            max_level: 14,
            min_level: 14,
            max_level_circle: 14,
        };
        let response = check_intersection(&features, &params, &EngineConfig::default()).unwrap();
        assert!(response.intersects_with_point);
        assert!(response.intersects_with_circle);
    }

    #[test]
    fn test_intersection_rejects_negative_radius() {
        let features = decode_geojson(SQUARE).unwrap();
        let params = intersect_params(0.5, 0.5, -1.0);
        assert!(matches!(
            check_intersection(&features, &params, &EngineConfig::default()),
            Err(CoverError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_cover_cell_limit() {
        let features = decode_geojson(SQUARE).unwrap();
        let config = EngineConfig {
            max_polygon_cells: 10,
            ..EngineConfig::default()
        };
        assert!(matches!(
            cover_geojson(&features, &cover_params(10, 5), &config),
            Err(CoverError::TooManyCells { limit: 10 })
        ));

        let params = intersect_params(0.5, 0.5, 1000.0);
        assert!(matches!(
            check_intersection(&features, &params, &config),
            Err(CoverError::TooManyCells { limit: 10 })
        ));
    }

    #[test]
    fn test_hex_fill_limit() {
        let features = decode_geojson(SQUARE).unwrap();
        let result = cover_hex_geojson(&features, 15, &EngineConfig::default());
        assert!(matches!(
            result,
            Err(CoverError::TooManyCells { limit: DEFAULT_MAX_POLYGON_CELLS })
        ));
    }

    #[test]
    fn test_response_field_names() {
        let response = CoverResponse {
            max_level_geojson: 10,
            cell_tokens: "89c".to_string(),
            cells: vec![vec![[1.0, 2.0]; 4]],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["max_level_geojson"], 10);
        assert_eq!(json["cell_tokens"], "89c");
        assert_eq!(json["cells"][0][0][1], 2.0);
    }
}
