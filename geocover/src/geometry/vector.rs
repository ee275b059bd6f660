//! Three-dimensional vectors for points on the unit sphere.

use std::ops::{Add, Mul, Neg, Sub};

/// A vector in ℝ³, usually a point on the unit sphere.
///
/// Cell edges and polygon edges are geodesics, so all predicates are
/// evaluated on these vectors rather than on latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn norm2(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }

    /// Scale to unit length. The zero vector is returned unchanged.
    pub fn normalize(&self) -> Vec3 {
        let n = self.norm();
        if n == 0.0 {
            *self
        } else {
            *self * (1.0 / n)
        }
    }

    /// Angle in radians between two vectors.
    ///
    /// Uses `atan2(|a×b|, a·b)`, which stays accurate for nearly parallel
    /// and nearly antipodal vectors.
    pub fn angle(&self, other: &Vec3) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }

    /// Index of the component with the largest absolute value.
    pub fn largest_abs_component(&self) -> usize {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        if ax > ay {
            if ax > az {
                0
            } else {
                2
            }
        } else if ay > az {
            1
        } else {
            2
        }
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z).
    pub fn component(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// A unit vector orthogonal to this one.
    pub fn ortho(&self) -> Vec3 {
        let axis = match self.largest_abs_component() {
            0 => Vec3::new(0.0, 1.0, 0.0),
            1 => Vec3::new(0.0, 0.0, 1.0),
            _ => Vec3::new(1.0, 0.0, 0.0),
        };
        self.cross(&axis).normalize()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Returns true if the geodesic edges AB and CD cross at a point interior to
/// both edges.
///
/// Edges sharing a vertex, or touching only at an endpoint, do not count as
/// crossing. The test compares the orientation of the triangles ACB, BDA,
/// CBD and DAC.
pub fn edges_cross(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> bool {
    let ab = a.cross(b);
    let acb = -ab.dot(c);
    let bda = ab.dot(d);
    if acb * bda <= 0.0 {
        return false;
    }

    let cd = c.cross(d);
    let cbd = -cd.dot(b);
    let dac = cd.dot(a);
    acb * cbd > 0.0 && acb * dac > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_of_axes() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_angle_right_angle() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let z = Vec3::new(0.0, 0.0, 1.0);
        assert!((x.angle(&z) - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn test_ortho_is_orthogonal_unit() {
        let v = Vec3::new(0.3, -0.8, 0.2).normalize();
        let o = v.ortho();
        assert!(v.dot(&o).abs() < 1e-15);
        assert!((o.norm() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_edges_cross_simple() {
        let a = Vec3::new(1.0, -0.1, 0.0).normalize();
        let b = Vec3::new(1.0, 0.1, 0.0).normalize();
        let c = Vec3::new(1.0, 0.0, -0.1).normalize();
        let d = Vec3::new(1.0, 0.0, 0.1).normalize();
        assert!(edges_cross(&a, &b, &c, &d));
        assert!(edges_cross(&c, &d, &a, &b));
    }

    #[test]
    fn test_edges_do_not_cross_when_apart() {
        let a = Vec3::new(1.0, -0.1, 0.0).normalize();
        let b = Vec3::new(1.0, 0.1, 0.0).normalize();
        let c = Vec3::new(1.0, 0.0, 0.05).normalize();
        let d = Vec3::new(1.0, 0.0, 0.1).normalize();
        assert!(!edges_cross(&a, &b, &c, &d));
    }

    #[test]
    fn test_shared_vertex_is_not_a_crossing() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.1, 0.0).normalize();
        let c = Vec3::new(1.0, 0.0, 0.1).normalize();
        assert!(!edges_cross(&a, &b, &a, &c));
    }
}
