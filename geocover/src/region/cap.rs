//! Spherical caps: every point within an angle of a centre.

use std::f64::consts::{FRAC_PI_2, PI};

use super::Region;
use crate::cell::Cell;
use crate::error::{CoverError, Result};
use crate::geometry::{LatLng, Vec3};

/// Mean Earth radius used to turn metres into angles.
pub const DEFAULT_EARTH_RADIUS_KM: f64 = 6371.01;

/// Convert a distance on the Earth's surface to an angle in radians.
///
/// `angle = (meters / 1000) / earth_radius_km`
///
/// # Errors
///
/// Returns `CoverError::InvalidRadius` if `meters` is negative or not finite.
pub fn radius_to_angle(meters: f64, earth_radius_km: f64) -> Result<f64> {
    if !meters.is_finite() || meters < 0.0 {
        return Err(CoverError::InvalidRadius(meters));
    }
    Ok((meters / 1000.0) / earth_radius_km)
}

/// A disc on the sphere given by a unit-vector centre and an angular radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    center: Vec3,
    radius: f64,
}

impl Cap {
    /// Create a cap. The centre is normalised; the radius is clamped to [0, π].
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self {
            center: center.normalize(),
            radius: radius.clamp(0.0, PI),
        }
    }

    /// Cap around a geographic point with a radius in metres.
    pub fn from_center_meters(center: &LatLng, meters: f64, earth_radius_km: f64) -> Result<Self> {
        let angle = radius_to_angle(meters, earth_radius_km)?;
        Ok(Self::new(center.to_vec3(), angle))
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Angular radius in radians.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The cap covering everything this one does not.
    pub fn complement(&self) -> Cap {
        Cap::new(-self.center, PI - self.radius)
    }

    /// Returns true if the two caps share at least one point.
    pub fn intersects_cap(&self, other: &Cap) -> bool {
        self.center.angle(&other.center) <= self.radius + other.radius
    }

    /// Edge test for a cell that contains none of its vertices in this cap.
    fn intersects_cell_edges(&self, cell: &Cell, vertices: &[Vec3; 4]) -> bool {
        // Cell and cap complement are both convex here, so with no vertex
        // inside, no interior point is inside either.
        if self.radius >= FRAC_PI_2 {
            return false;
        }
        if cell.contains_point(&self.center) {
            return true;
        }

        let sin2 = self.radius.sin().powi(2);
        for k in 0..4 {
            let edge = cell.edge_normal(k);
            let dot = self.center.dot(&edge);
            if dot > 0.0 {
                // Centre is on the inner side of this edge; if the cap reaches
                // the cell it also reaches the opposite edge.
                continue;
            }
            if dot * dot > sin2 * edge.norm2() {
                return false;
            }
            let dir = edge.cross(&self.center);
            if dir.dot(&vertices[k]) < 0.0 && dir.dot(&vertices[(k + 1) & 3]) > 0.0 {
                return true;
            }
        }
        false
    }
}

impl Region for Cap {
    fn cap_bound(&self) -> Cap {
        *self
    }

    fn contains_cell(&self, cell: &Cell) -> bool {
        let vertices = cell.vertex_vectors();
        if !vertices.iter().all(|v| self.contains_point(v)) {
            return false;
        }
        !self.complement().intersects_cell_edges(cell, &vertices)
    }

    fn intersects_cell(&self, cell: &Cell) -> bool {
        let vertices = cell.vertex_vectors();
        if vertices.iter().any(|v| self.contains_point(v)) {
            return true;
        }
        self.intersects_cell_edges(cell, &vertices)
    }

    fn contains_point(&self, p: &Vec3) -> bool {
        self.center.angle(p) <= self.radius
    }
}
