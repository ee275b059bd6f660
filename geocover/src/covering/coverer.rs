//! Region coverers for polygons, points and caps.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::Covering;
use crate::cell::{check_level, Cell, CellId, NUM_FACES};
use crate::error::{CoverError, Result};
use crate::geometry::{LatLng, Polygon};
use crate::region::{Cap, LoopRegion, Region};

/// Covering of one polygon ring, with its tokens and cell corners in id order.
#[derive(Debug, Clone)]
pub struct PolygonCovering {
    pub covering: Covering,
    pub tokens: Vec<String>,
    pub vertex_sets: Vec<[LatLng; 4]>,
}

/// The single cell covering a point.
#[derive(Debug, Clone, Copy)]
pub struct PointCovering {
    pub cell: CellId,
    pub vertices: [LatLng; 4],
}

impl PointCovering {
    pub fn token(&self) -> String {
        self.cell.to_token()
    }
}

/// Cover a polygon ring with cells between `min_level` and `max_level`
/// (`CoverPolygon`).
///
/// Cells fully inside the polygon are emitted as soon as they are reached at
/// or below `min_level`; boundary cells are refined down to `max_level`.
///
/// # Errors
///
/// - `InvalidLevel` if either level exceeds 30.
/// - `InvalidLevelRange` if `max_level < min_level`.
/// - `InvalidGeometry` if the ring does not fit within a hemisphere.
/// - `TooManyCells` if the cells at `min_level` inside the polygon's
///   bounding cap, or the accepted cells, exceed `cell_limit`.
pub fn cover_polygon(
    polygon: &Polygon,
    max_level: u8,
    min_level: u8,
    cell_limit: usize,
) -> Result<PolygonCovering> {
    check_level(max_level)?;
    check_level(min_level)?;
    if max_level < min_level {
        return Err(CoverError::InvalidLevelRange {
            min_level,
            max_level,
        });
    }

    let region = LoopRegion::new(polygon)?;
    let bound = region.cap_bound();

    // Coarse descent: only the bounding cap is consulted above min_level.
    let mut frontier: Vec<Cell> = (0..NUM_FACES)
        .map(|face| Cell::new(CellId::from_face(face)))
        .filter(|cell| bound.intersects_cell(cell))
        .collect();
    for _ in 0..min_level {
        frontier = frontier
            .iter()
            .filter_map(Cell::subdivide)
            .flatten()
            .filter(|child| bound.intersects_cell(child))
            .collect();
        check_cell_count(frontier.len(), cell_limit)?;
    }

    let mut accepted = Vec::new();
    let mut stack = frontier;
    while let Some(cell) = stack.pop() {
        if !region.intersects_cell(&cell) {
            continue;
        }
        if cell.level() >= max_level || region.contains_cell(&cell) {
            accepted.push(cell.id());
            check_cell_count(accepted.len(), cell_limit)?;
            continue;
        }
        match cell.subdivide() {
            Some(children) => stack.extend(children),
            None => accepted.push(cell.id()),
        }
    }

    let covering = Covering::new(accepted);
    debug!(
        vertices = polygon.vertices().len(),
        min_level,
        max_level,
        cells = covering.len(),
        "Covered polygon"
    );

    Ok(PolygonCovering {
        tokens: covering.tokens(),
        vertex_sets: covering.vertex_sets(),
        covering,
    })
}

fn check_cell_count(count: usize, limit: usize) -> Result<()> {
    if count > limit {
        debug!(count, limit, "Polygon covering over the cell limit");
        return Err(CoverError::TooManyCells { limit });
    }
    Ok(())
}

/// The cell at `max_level` containing a point (`CoverPoint`).
///
/// # Errors
///
/// Returns `InvalidLevel` if `max_level` exceeds 30.
pub fn cover_point(point: &LatLng, max_level: u8) -> Result<PointCovering> {
    let cell = CellId::from_lat_lng(point, max_level)?;
    Ok(PointCovering {
        cell,
        vertices: Cell::new(cell).vertices(),
    })
}

/// Cover a circle of `radius_meters` around `center` with at most
/// `max_cells` cells no finer than `max_level` (`CoverCap`).
///
/// The budget is a hard cap. It must allow one cell per cube face, since
/// cells on different faces cannot be merged.
///
/// # Errors
///
/// - `InvalidLevel` if `max_level` exceeds 30.
/// - `InvalidRadius` if the radius is negative or not finite.
/// - `InvalidCellBudget` if `max_cells` is below 6.
pub fn cover_cap(
    center: &LatLng,
    radius_meters: f64,
    max_level: u8,
    max_cells: usize,
    earth_radius_km: f64,
) -> Result<Covering> {
    check_level(max_level)?;
    if max_cells < NUM_FACES as usize {
        return Err(CoverError::InvalidCellBudget(max_cells));
    }
    let cap = Cap::from_center_meters(center, radius_meters, earth_radius_km)?;

    let coverer = RegionCoverer {
        min_level: 0,
        max_level,
        max_cells,
    };
    let mut covering = Covering::new(coverer.covering(&cap));
    covering.normalize();
    if covering.len() > max_cells {
        trace!(cells = covering.len(), max_cells, "Coarsening cap covering");
        covering.reduce_to(max_cells);
    }

    debug!(
        lat = center.lat(),
        lng = center.lng(),
        radius_meters,
        max_level,
        cells = covering.len(),
        "Covered cap"
    );
    Ok(covering)
}

/// Best-first coverer bounded by a cell budget.
///
/// Candidates are expanded from the coarsest level down; a candidate is only
/// split while the result would still fit the budget, otherwise it is
/// emitted whole.
#[derive(Debug, Clone, Copy)]
struct RegionCoverer {
    min_level: u8,
    max_level: u8,
    max_cells: usize,
}

#[derive(Debug)]
struct Candidate {
    cell: Cell,
    terminal: bool,
    children: Vec<Candidate>,
}

/// Queue entry ordered by priority alone.
#[derive(Debug)]
struct Queued {
    priority: i64,
    candidate: Candidate,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

/// State of a single covering run.
struct CoverRun<'a, R: Region> {
    options: RegionCoverer,
    region: &'a R,
    queue: BinaryHeap<Queued>,
    result: Vec<CellId>,
}

impl RegionCoverer {
    fn covering<R: Region>(&self, region: &R) -> Vec<CellId> {
        let mut run = CoverRun {
            options: *self,
            region,
            queue: BinaryHeap::new(),
            result: Vec::new(),
        };

        for face in 0..NUM_FACES {
            if let Some(candidate) = run.new_candidate(Cell::new(CellId::from_face(face))) {
                run.add_candidate(candidate);
            }
        }

        while let Some(Queued { mut candidate, .. }) = run.queue.pop() {
            let expand = candidate.cell.level() < self.min_level
                || candidate.children.len() == 1
                || run.result.len() + run.queue.len() + candidate.children.len() <= self.max_cells;
            if expand {
                for child in std::mem::take(&mut candidate.children) {
                    run.add_candidate(child);
                }
            } else {
                candidate.terminal = true;
                run.add_candidate(candidate);
            }
        }

        run.result
    }
}

impl<R: Region> CoverRun<'_, R> {
    fn new_candidate(&self, cell: Cell) -> Option<Candidate> {
        if !self.region.intersects_cell(&cell) {
            return None;
        }
        let terminal = cell.level() >= self.options.min_level
            && (cell.level() >= self.options.max_level || self.region.contains_cell(&cell));
        Some(Candidate {
            cell,
            terminal,
            children: Vec::new(),
        })
    }

    /// Populate the candidate's children, returning how many are terminal.
    fn expand_children(&self, candidate: &mut Candidate) -> usize {
        let Some(children) = candidate.cell.subdivide() else {
            return 0;
        };
        let mut terminals = 0;
        for child in children {
            if let Some(child) = self.new_candidate(child) {
                if child.terminal {
                    terminals += 1;
                }
                candidate.children.push(child);
            }
        }
        terminals
    }

    fn add_candidate(&mut self, mut candidate: Candidate) {
        if candidate.terminal {
            self.result.push(candidate.cell.id());
            return;
        }

        let terminals = self.expand_children(&mut candidate);
        if candidate.children.is_empty() {
            return;
        }
        if terminals == 4 && candidate.cell.level() >= self.options.min_level {
            // Every child would be emitted; emit the parent instead.
            candidate.children.clear();
            candidate.terminal = true;
            self.add_candidate(candidate);
            return;
        }

        let level = candidate.cell.level() as i64;
        let children = candidate.children.len() as i64;
        let priority = -((((level << 2) + children) << 2) + terminals as i64);
        self.queue.push(Queued {
            priority,
            candidate,
        });
    }
}
