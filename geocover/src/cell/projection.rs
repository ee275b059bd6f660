//! Cube-sphere projection and Hilbert-curve tables.
//!
//! A unit vector is mapped to one of 6 cube faces, then to face-local
//! (u, v) coordinates in [-1, 1], then through a quadratic transform to
//! (s, t) in [0, 1] so that cells at one level have similar areas, and
//! finally to integer (i, j) leaf coordinates in [0, 2^30).

use crate::geometry::Vec3;

/// Number of leaf positions along one face axis.
pub(crate) const MAX_SIZE: u32 = 1 << 30;

pub(crate) const SWAP_MASK: u8 = 0x01;
pub(crate) const INVERT_MASK: u8 = 0x02;

/// Hilbert position of a child, by (orientation, ij) where ij = (i << 1) | j.
pub(crate) const IJ_TO_POS: [[u8; 4]; 4] = [
    [0, 1, 3, 2], // canonical
    [0, 3, 1, 2], // axes swapped
    [2, 3, 1, 0], // bits inverted
    [2, 1, 3, 0], // swapped & inverted
];

/// Child (i << 1) | j by (orientation, Hilbert position).
pub(crate) const POS_TO_IJ: [[u8; 4]; 4] = [
    [0, 1, 3, 2],
    [0, 2, 3, 1],
    [3, 2, 0, 1],
    [3, 1, 0, 2],
];

/// Orientation change applied when descending into the child at a position.
pub(crate) const POS_TO_ORIENTATION: [u8; 4] = [SWAP_MASK, 0, 0, INVERT_MASK | SWAP_MASK];

/// Face containing the vector (largest component axis, +3 when negative).
pub(crate) fn face_of(p: &Vec3) -> u8 {
    let axis = p.largest_abs_component();
    if p.component(axis) < 0.0 {
        axis as u8 + 3
    } else {
        axis as u8
    }
}

/// Project a vector onto a face, assuming it lies in that face's hemisphere.
pub(crate) fn valid_face_xyz_to_uv(face: u8, p: &Vec3) -> (f64, f64) {
    match face {
        0 => (p.y / p.x, p.z / p.x),
        1 => (-p.x / p.y, p.z / p.y),
        2 => (-p.x / p.z, -p.y / p.z),
        3 => (p.z / p.x, p.y / p.x),
        4 => (p.z / p.y, -p.x / p.y),
        _ => (-p.y / p.z, -p.x / p.z),
    }
}

/// Project a vector onto a face, or `None` if it is behind that face.
pub(crate) fn face_xyz_to_uv(face: u8, p: &Vec3) -> Option<(f64, f64)> {
    let axis = (face % 3) as usize;
    let c = p.component(axis);
    let in_front = if face < 3 { c > 0.0 } else { c < 0.0 };
    if in_front {
        Some(valid_face_xyz_to_uv(face, p))
    } else {
        None
    }
}

/// Face-local (u, v) back to an (unnormalised) vector.
pub(crate) fn face_uv_to_xyz(face: u8, u: f64, v: f64) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, u, v),
        1 => Vec3::new(-u, 1.0, v),
        2 => Vec3::new(-u, -v, 1.0),
        3 => Vec3::new(-1.0, -v, -u),
        4 => Vec3::new(v, -1.0, -u),
        _ => Vec3::new(v, u, -1.0),
    }
}

/// Quadratic transform from s/t space to u/v space.
pub(crate) fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (1.0 / 3.0) * (4.0 * s * s - 1.0)
    } else {
        (1.0 / 3.0) * (1.0 - 4.0 * (1.0 - s) * (1.0 - s))
    }
}

/// Inverse of [`st_to_uv`].
pub(crate) fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

/// Leaf coordinate along one axis for an s/t value, clamped to the face.
pub(crate) fn st_to_ij(s: f64) -> u32 {
    let ij = (MAX_SIZE as f64 * s).floor();
    ij.clamp(0.0, (MAX_SIZE - 1) as f64) as u32
}

/// s/t value of a leaf coordinate boundary.
pub(crate) fn ij_to_st(ij: u32) -> f64 {
    ij as f64 / MAX_SIZE as f64
}

/// Map a vector to (face, i, j) leaf coordinates.
pub(crate) fn xyz_to_face_ij(p: &Vec3) -> (u8, u32, u32) {
    let face = face_of(p);
    let (u, v) = valid_face_xyz_to_uv(face, p);
    (face, st_to_ij(uv_to_st(u)), st_to_ij(uv_to_st(v)))
}
