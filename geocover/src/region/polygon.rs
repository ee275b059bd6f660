//! Polygon rings as regions on the sphere.

use std::f64::consts::FRAC_PI_2;

use super::{Cap, Region};
use crate::cell::Cell;
use crate::error::{CoverError, Result};
use crate::geometry::{edges_cross, Polygon, Vec3};

/// A polygon ring with geodesic edges.
///
/// The interior is the smaller of the two regions the ring bounds, which
/// requires the ring to fit within an open hemisphere. Point containment is
/// evaluated in the gnomonic projection centred on the ring, where geodesics
/// become straight lines.
#[derive(Debug, Clone)]
pub struct LoopRegion {
    vertices: Vec<Vec3>,
    bound: Cap,
    /// Gnomonic projection frame: tangent axes at the bound's centre.
    axes: (Vec3, Vec3),
    projected: Vec<(f64, f64)>,
}

impl LoopRegion {
    /// Build the region for a polygon ring.
    ///
    /// # Errors
    ///
    /// Returns `CoverError::InvalidGeometry` if the ring does not fit within
    /// a hemisphere.
    pub fn new(polygon: &Polygon) -> Result<Self> {
        let vertices: Vec<Vec3> = polygon.vertices().iter().map(|v| v.to_vec3()).collect();

        let sum = vertices
            .iter()
            .fold(Vec3::new(0.0, 0.0, 0.0), |acc, v| acc + *v);
        if sum.norm() < 1e-12 {
            return Err(CoverError::InvalidGeometry(
                "polygon vertices are balanced around the sphere".to_string(),
            ));
        }
        let center = sum.normalize();
        let radius = vertices
            .iter()
            .map(|v| center.angle(v))
            .fold(0.0_f64, f64::max);
        if radius >= FRAC_PI_2 - 1e-9 {
            return Err(CoverError::InvalidGeometry(format!(
                "polygon spans {:.1}° from its centre; it must fit within a hemisphere",
                radius.to_degrees()
            )));
        }

        let e1 = center.ortho();
        let e2 = center.cross(&e1);
        let projected = vertices
            .iter()
            .map(|v| gnomonic(v, &center, &e1, &e2))
            .collect();

        Ok(Self {
            vertices,
            bound: Cap::new(center, radius * (1.0 + 1e-12) + 1e-15),
            axes: (e1, e2),
            projected,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (&Vec3, &Vec3)> {
        let n = self.vertices.len();
        (0..n).map(move |k| (&self.vertices[k], &self.vertices[(k + 1) % n]))
    }

    /// Returns true if any cell edge crosses any ring edge.
    fn crosses_cell_boundary(&self, corners: &[Vec3; 4]) -> bool {
        (0..4).any(|k| {
            let (c, d) = (&corners[k], &corners[(k + 1) & 3]);
            self.edges().any(|(a, b)| edges_cross(a, b, c, d))
        })
    }
}

impl Region for LoopRegion {
    fn cap_bound(&self) -> Cap {
        self.bound
    }

    fn contains_cell(&self, cell: &Cell) -> bool {
        if !self.bound.intersects_cap(&cell.cap_bound()) {
            return false;
        }
        let corners = cell.vertex_vectors();
        corners.iter().all(|c| self.contains_point(c)) && !self.crosses_cell_boundary(&corners)
    }

    fn intersects_cell(&self, cell: &Cell) -> bool {
        if !self.bound.intersects_cap(&cell.cap_bound()) {
            return false;
        }
        // Ring inside the cell.
        if self.vertices.iter().any(|v| cell.contains_point(v)) {
            return true;
        }
        // Cell inside the ring.
        let corners = cell.vertex_vectors();
        if corners.iter().any(|c| self.contains_point(c)) {
            return true;
        }
        self.crosses_cell_boundary(&corners)
    }

    fn contains_point(&self, p: &Vec3) -> bool {
        let center = self.bound.center();
        if p.dot(&center) <= 0.0 || !self.bound.contains_point(p) {
            return false;
        }
        let (x, y) = gnomonic(p, &center, &self.axes.0, &self.axes.1);

        let n = self.projected.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.projected[i];
            let (xj, yj) = self.projected[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Gnomonic projection onto the tangent plane at `center`.
fn gnomonic(p: &Vec3, center: &Vec3, e1: &Vec3, e2: &Vec3) -> (f64, f64) {
    let d = p.dot(center);
    (p.dot(e1) / d, p.dot(e2) / d)
}
