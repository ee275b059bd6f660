//! Regions that can be covered with cells.
//!
//! The coverer only talks to regions through the [`Region`] trait, so a new
//! region kind needs nothing beyond these four predicates.

mod cap;
mod polygon;

pub use cap::{radius_to_angle, Cap, DEFAULT_EARTH_RADIUS_KM};
pub use polygon::LoopRegion;

use crate::cell::Cell;
use crate::geometry::Vec3;

/// A region of the unit sphere.
pub trait Region {
    /// A cap containing the whole region.
    fn cap_bound(&self) -> Cap;

    /// Returns true if the region contains the whole cell.
    ///
    /// May return false for cells that are in fact contained; the coverer
    /// only subdivides further in that case.
    fn contains_cell(&self, cell: &Cell) -> bool;

    /// Returns true if the region may intersect the cell.
    ///
    /// Must not return false for a cell that intersects the region.
    fn intersects_cell(&self, cell: &Cell) -> bool;

    /// Returns true if the region contains the point.
    fn contains_point(&self, p: &Vec3) -> bool;
}
