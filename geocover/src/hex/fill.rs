//! Polygon fill and compaction over the hexagonal grid.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use super::lattice::{to_axial, Eisenstein};
use super::{check_resolution, to_lattice_plane, HexCell};
use crate::error::{CoverError, Result};
use crate::geometry::{LatLng, Polygon};

/// Every cell at `resolution` whose centre lies inside the polygon
/// (`PolyfillHex`).
///
/// Containment is the planar even-odd test in longitude/latitude. Candidate
/// lattice rows spanning the polygon's bounding box are tested in parallel.
///
/// # Errors
///
/// - `InvalidResolution` if `resolution > 15`.
/// - `TooManyCells` if the bounding box holds more than `max_cells`
///   candidate cells. Nothing is scanned in that case.
pub fn polyfill(polygon: &Polygon, resolution: u8, max_cells: usize) -> Result<HashSet<HexCell>> {
    check_resolution(resolution)?;

    let bbox = polygon.bounding_box();
    let corners = [
        (bbox.min_lng, bbox.min_lat),
        (bbox.min_lng, bbox.max_lat),
        (bbox.max_lng, bbox.min_lat),
        (bbox.max_lng, bbox.max_lat),
    ]
    .map(|(lng, lat)| {
        let (x, y) = to_lattice_plane(lng, lat, resolution);
        to_axial(x, y)
    });

    let a_min = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min).floor() as i64 - 1;
    let a_max = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max).ceil() as i64 + 1;
    let b_min = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min).floor() as i64 - 1;
    let b_max = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max).ceil() as i64 + 1;

    let candidates = (a_max - a_min + 1)
        .unsigned_abs()
        .saturating_mul((b_max - b_min + 1).unsigned_abs());
    if candidates > max_cells as u64 {
        debug!(resolution, candidates, max_cells, "Hexagon fill over cell limit");
        return Err(CoverError::TooManyCells { limit: max_cells });
    }

    let cells: HashSet<HexCell> = (b_min..=b_max)
        .into_par_iter()
        .flat_map_iter(|b| {
            (a_min..=a_max).filter_map(move |a| {
                let cell = HexCell {
                    resolution,
                    coord: Eisenstein::new(a, b),
                };
                let (lng, lat) = cell.plane_position();
                let center = LatLng::new(lat, lng).ok()?;
                polygon.contains_planar(&center).then_some(cell)
            })
        })
        .collect();

    debug!(
        resolution,
        candidates,
        cells = cells.len(),
        "Filled polygon with hexagons"
    );
    Ok(cells)
}

/// Replace every complete group of 7 siblings by their parent, repeatedly
/// (`CompactHex`).
///
/// # Errors
///
/// Returns `CoverError::MixedResolution` if the cells do not all share one
/// resolution.
pub fn compact(cells: &HashSet<HexCell>) -> Result<HashSet<HexCell>> {
    let Some(first) = cells.iter().next() else {
        return Ok(HashSet::new());
    };
    if let Some(other) = cells.iter().find(|c| c.resolution != first.resolution) {
        return Err(CoverError::MixedResolution {
            first: first.resolution,
            second: other.resolution,
        });
    }

    let mut compacted = HashSet::new();
    let mut current = cells.clone();
    while !current.is_empty() {
        let mut groups: HashMap<HexCell, Vec<HexCell>> = HashMap::new();
        for cell in current {
            match cell.parent() {
                Some(parent) => groups.entry(parent).or_default().push(cell),
                None => {
                    compacted.insert(cell);
                }
            }
        }

        let mut parents = HashSet::new();
        for (parent, children) in groups {
            if children.len() == 7 {
                parents.insert(parent);
            } else {
                compacted.extend(children);
            }
        }
        current = parents;
    }

    debug!(
        input = cells.len(),
        output = compacted.len(),
        "Compacted hexagons"
    );
    Ok(compacted)
}

/// Expand every cell to its descendants at `resolution`; the inverse of
/// [`compact`].
///
/// # Errors
///
/// - `InvalidResolution` if `resolution > 15`, or if a cell is finer than
///   `resolution`.
pub fn uncompact(cells: &HashSet<HexCell>, resolution: u8) -> Result<HashSet<HexCell>> {
    check_resolution(resolution)?;
    if cells.iter().any(|c| c.resolution > resolution) {
        return Err(CoverError::InvalidResolution(resolution as i64));
    }

    let mut expanded = HashSet::new();
    let mut pending: Vec<HexCell> = cells.iter().copied().collect();
    while let Some(cell) = pending.pop() {
        if cell.resolution == resolution {
            expanded.insert(cell);
            continue;
        }
        if let Some(children) = cell.children() {
            pending.extend(children);
        }
    }
    Ok(expanded)
}
