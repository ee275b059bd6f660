//! Hierarchical cell index over the unit sphere.
//!
//! The sphere is projected onto the 6 faces of a cube; each face is the root
//! of a quadtree 30 levels deep. Cells are addressed by a 64-bit [`CellId`]:
//!
//! ```text
//!  63   61 60                                                  0
//! ┌──────┬───────────────────────────────────────────────┬──────┐
//! │ face │ 2 bits of Hilbert position per level (≤ 30)   │  1   │
//! └──────┴───────────────────────────────────────────────┴──────┘
//! ```
//!
//! The lowest set bit marks the level: a level-L cell has its marker at bit
//! `2 * (30 - L)`. Ordering ids numerically walks a Hilbert curve over each
//! face, and every cell's descendants occupy the contiguous id range
//! `[range_min, range_max]`, which is what makes containment checks cheap.

mod projection;

use std::fmt;
use std::str::FromStr;

use crate::error::{CoverError, Result};
use crate::geometry::{LatLng, Vec3};
use crate::region::Cap;

use projection::{
    face_uv_to_xyz, face_xyz_to_uv, ij_to_st, st_to_uv, xyz_to_face_ij, IJ_TO_POS, MAX_SIZE,
    POS_TO_IJ, POS_TO_ORIENTATION, SWAP_MASK,
};

/// Finest cell level.
pub const MAX_LEVEL: u8 = 30;

/// Number of cube faces (level-0 cells).
pub const NUM_FACES: u8 = 6;

const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;

/// Identifier of a cell in the hierarchical index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Wrap a raw 64-bit id without validation.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw 64-bit id.
    pub fn id(&self) -> u64 {
        self.0
    }

    /// The level-0 cell of a cube face.
    pub fn from_face(face: u8) -> Self {
        Self(((face as u64) << POS_BITS) + lsb_for_level(0))
    }

    /// The cell at `level` containing the given point (`CellForPoint`).
    ///
    /// # Errors
    ///
    /// Returns `CoverError::InvalidLevel` if `level > 30`.
    pub fn from_lat_lng(point: &LatLng, level: u8) -> Result<Self> {
        check_level(level)?;
        Ok(Self::from_point(&point.to_vec3()).parent(level))
    }

    /// The leaf cell containing a unit vector.
    pub fn from_point(p: &Vec3) -> Self {
        let (face, i, j) = xyz_to_face_ij(p);
        Self::from_face_ij(face, i, j, MAX_LEVEL)
    }

    /// Build the id of the level-`level` cell containing leaf (i, j) on `face`.
    pub(crate) fn from_face_ij(face: u8, i: u32, j: u32, level: u8) -> Self {
        let mut id = (face as u64) << POS_BITS;
        let mut orientation = face & SWAP_MASK;
        for k in 1..=level as u32 {
            let bit = MAX_LEVEL as u32 - k;
            let ij = ((((i >> bit) & 1) << 1) | ((j >> bit) & 1)) as usize;
            let pos = IJ_TO_POS[orientation as usize][ij];
            id |= (pos as u64) << (POS_BITS - 2 * k);
            orientation ^= POS_TO_ORIENTATION[pos as usize];
        }
        Self(id | lsb_for_level(level))
    }

    /// Face and leaf (i, j) coordinates of the cell's lower-left corner.
    pub(crate) fn to_face_ij(self) -> (u8, u32, u32) {
        let face = self.face();
        let level = self.level();
        let mut orientation = face & SWAP_MASK;
        let (mut i, mut j) = (0u32, 0u32);
        for k in 1..=level as u32 {
            let pos = ((self.0 >> (POS_BITS - 2 * k)) & 3) as usize;
            let ij = POS_TO_IJ[orientation as usize][pos] as u32;
            i = (i << 1) | (ij >> 1);
            j = (j << 1) | (ij & 1);
            orientation ^= POS_TO_ORIENTATION[pos];
        }
        let shift = (MAX_LEVEL - level) as u32;
        (face, i << shift, j << shift)
    }

    /// Cube face (0..6).
    pub fn face(&self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// Lowest set bit, the level marker.
    pub fn lsb(&self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// Subdivision level (0 = face, 30 = leaf).
    pub fn level(&self) -> u8 {
        MAX_LEVEL - (self.0.trailing_zeros() / 2) as u8
    }

    /// Returns true if the id denotes an actual cell.
    pub fn is_valid(&self) -> bool {
        self.face() < NUM_FACES && (self.lsb() & 0x1555_5555_5555_5555) != 0
    }

    pub fn is_face(&self) -> bool {
        self.level() == 0
    }

    pub fn is_leaf(&self) -> bool {
        self.0 & 1 != 0
    }

    /// Ancestor at `level`. `level` must not exceed this cell's level.
    pub fn parent(&self, level: u8) -> CellId {
        debug_assert!(level <= self.level());
        let lsb = lsb_for_level(level);
        CellId((self.0 & lsb.wrapping_neg()) | lsb)
    }

    /// Parent one level up, `None` for face cells.
    pub fn immediate_parent(&self) -> Option<CellId> {
        if self.is_face() {
            None
        } else {
            Some(self.parent(self.level() - 1))
        }
    }

    /// The 4 children in Hilbert order, `None` for leaf cells.
    pub fn children(&self) -> Option<[CellId; 4]> {
        if self.is_leaf() {
            return None;
        }
        let lsb = self.lsb();
        let child_lsb = lsb >> 2;
        let base = self.0 - lsb;
        Some([0u64, 1, 2, 3].map(|k| CellId(base + (2 * k + 1) * child_lsb)))
    }

    /// First leaf id inside this cell.
    pub fn range_min(&self) -> CellId {
        CellId(self.0 - (self.lsb() - 1))
    }

    /// Last leaf id inside this cell.
    pub fn range_max(&self) -> CellId {
        CellId(self.0 + (self.lsb() - 1))
    }

    /// Returns true if `other` is this cell or one of its descendants.
    pub fn contains(&self, other: &CellId) -> bool {
        *other >= self.range_min() && *other <= self.range_max()
    }

    /// Returns true if either cell contains the other.
    pub fn intersects(&self, other: &CellId) -> bool {
        other.range_min() <= self.range_max() && other.range_max() >= self.range_min()
    }

    /// Level of the deepest cell containing both, `None` across faces.
    pub fn common_ancestor_level(&self, other: &CellId) -> Option<u8> {
        let bits = (self.0 ^ other.0).max(self.lsb()).max(other.lsb());
        let msb = 63 - bits.leading_zeros();
        if msb > 60 {
            None
        } else {
            Some(((60 - msb) >> 1) as u8)
        }
    }

    /// Short textual form (`Token`): hex digits with trailing zeros removed.
    pub fn to_token(&self) -> String {
        if self.0 == 0 {
            return "X".to_string();
        }
        let hex = format!("{:016x}", self.0);
        hex.trim_end_matches('0').to_string()
    }

    /// Parse a token produced by [`CellId::to_token`] (`CellFromToken`).
    ///
    /// # Errors
    ///
    /// Returns `CoverError::InvalidToken` for empty, over-long or non-hex
    /// input, and for tokens that do not denote a valid cell.
    pub fn from_token(token: &str) -> Result<CellId> {
        let invalid = || CoverError::InvalidToken(token.to_string());
        if token.is_empty()
            || token.len() > 16
            || !token.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(invalid());
        }
        let value = u64::from_str_radix(token, 16).map_err(|_| invalid())?;
        let id = CellId(value << (4 * (16 - token.len() as u32)));
        if !id.is_valid() {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token())
    }
}

impl FromStr for CellId {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self> {
        CellId::from_token(s)
    }
}

/// Level marker bit for a level.
pub(crate) fn lsb_for_level(level: u8) -> u64 {
    1u64 << (2 * (MAX_LEVEL - level) as u32)
}

/// Validate a level received from outside the engine.
pub(crate) fn check_level(level: u8) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(CoverError::InvalidLevel(level as i64));
    }
    Ok(())
}

/// Geometry of a cell: face, level and its bounds in face-local (u, v).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    id: CellId,
    face: u8,
    level: u8,
    u: [f64; 2],
    v: [f64; 2],
}

impl Cell {
    pub fn new(id: CellId) -> Self {
        let (face, i, j) = id.to_face_ij();
        let level = id.level();
        let size = 1u32 << (MAX_LEVEL - level) as u32;
        let u = [st_to_uv(ij_to_st(i)), st_to_uv(ij_to_st(i + size))];
        let v = [st_to_uv(ij_to_st(j)), st_to_uv(ij_to_st(j + size))];
        Self {
            id,
            face,
            level,
            u,
            v,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn face(&self) -> u8 {
        self.face
    }

    /// Vertex `k` (0..4) as a unit vector, counter-clockwise from (u_lo, v_lo).
    pub fn vertex(&self, k: usize) -> Vec3 {
        let (u, v) = match k & 3 {
            0 => (self.u[0], self.v[0]),
            1 => (self.u[1], self.v[0]),
            2 => (self.u[1], self.v[1]),
            _ => (self.u[0], self.v[1]),
        };
        face_uv_to_xyz(self.face, u, v).normalize()
    }

    pub fn vertex_vectors(&self) -> [Vec3; 4] {
        [0, 1, 2, 3].map(|k| self.vertex(k))
    }

    /// The 4 corners as geographic points (`Vertices`).
    pub fn vertices(&self) -> [LatLng; 4] {
        self.vertex_vectors().map(|v| LatLng::from_vec3(&v))
    }

    /// Inward-facing (unnormalised) normal of the edge from vertex `k` to `k + 1`.
    pub fn edge_normal(&self, k: usize) -> Vec3 {
        self.vertex(k).cross(&self.vertex(k + 1))
    }

    /// Unit vector at the cell's centre in s/t space.
    pub fn center(&self) -> Vec3 {
        let (_, i, j) = self.id.to_face_ij();
        let half = (1u64 << (MAX_LEVEL - self.level) as u32) as f64 / 2.0;
        let s = (i as f64 + half) / MAX_SIZE as f64;
        let t = (j as f64 + half) / MAX_SIZE as f64;
        face_uv_to_xyz(self.face, st_to_uv(s), st_to_uv(t)).normalize()
    }

    /// Returns true if the point lies inside or on the boundary of the cell.
    pub fn contains_point(&self, p: &Vec3) -> bool {
        const EPS: f64 = 1e-15;
        match face_xyz_to_uv(self.face, p) {
            Some((u, v)) => {
                u >= self.u[0] - EPS
                    && u <= self.u[1] + EPS
                    && v >= self.v[0] - EPS
                    && v <= self.v[1] + EPS
            }
            None => false,
        }
    }

    /// A cap containing the whole cell.
    pub fn cap_bound(&self) -> Cap {
        let center = self.center();
        let radius = self
            .vertex_vectors()
            .iter()
            .map(|v| center.angle(v))
            .fold(0.0_f64, f64::max);
        Cap::new(center, radius * (1.0 + 1e-12) + 1e-15)
    }

    /// The 4 children, `None` for leaf cells.
    pub fn subdivide(&self) -> Option<[Cell; 4]> {
        self.id.children().map(|ids| ids.map(Cell::new))
    }
}

impl From<CellId> for Cell {
    fn from(id: CellId) -> Self {
        Cell::new(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::region::Region;
    use super::*;

    fn sf() -> LatLng {
        LatLng::new(37.7749, -122.4194).unwrap()
    }

    #[test]
    fn test_face_cells() {
        for face in 0..NUM_FACES {
            let id = CellId::from_face(face);
            assert!(id.is_valid());
            assert!(id.is_face());
            assert_eq!(id.face(), face);
            assert_eq!(id.level(), 0);
            assert!(id.immediate_parent().is_none());
        }
    }

    #[test]
    fn test_cell_for_point_is_deterministic() {
        let a = CellId::from_lat_lng(&sf(), 15).unwrap();
        let b = CellId::from_lat_lng(&sf(), 15).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.level(), 15);
        assert!(a.is_valid());
    }

    #[test]
    fn test_cell_for_point_rejects_bad_level() {
        assert!(matches!(
            CellId::from_lat_lng(&sf(), 31),
            Err(CoverError::InvalidLevel(31))
        ));
    }

    #[test]
    fn test_cell_contains_its_point() {
        for level in [0u8, 1, 5, 10, 15, 20, 30] {
            let id = CellId::from_lat_lng(&sf(), level).unwrap();
            let cell = Cell::new(id);
            assert!(
                cell.contains_point(&sf().to_vec3()),
                "level {} cell should contain the point",
                level
            );
        }
    }

    #[test]
    fn test_parent_child_relationship() {
        let id = CellId::from_lat_lng(&sf(), 12).unwrap();
        let children = id.children().unwrap();
        for child in children {
            assert_eq!(child.level(), 13);
            assert_eq!(child.immediate_parent(), Some(id));
            assert!(id.contains(&child));
            assert!(!child.contains(&id));
            assert!(id.intersects(&child));
        }
        assert_eq!(children[0].range_min(), id.range_min());
        assert_eq!(children[3].range_max(), id.range_max());
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = CellId::from_point(&sf().to_vec3());
        assert!(leaf.is_leaf());
        assert_eq!(leaf.level(), MAX_LEVEL);
        assert!(leaf.children().is_none());
    }

    #[test]
    fn test_face_ij_roundtrip() {
        let id = CellId::from_lat_lng(&sf(), 17).unwrap();
        let (face, i, j) = id.to_face_ij();
        assert_eq!(CellId::from_face_ij(face, i, j, 17), id);
    }

    #[test]
    fn test_children_geometry_matches_ids() {
        let id = CellId::from_lat_lng(&sf(), 8).unwrap();
        for child in id.children().unwrap() {
            let center = Cell::new(child).center();
            assert_eq!(CellId::from_point(&center).parent(9), child);
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let id = CellId::from_lat_lng(&sf(), 15).unwrap();
        let token = id.to_token();
        assert!(token.len() <= 16);
        assert!(!token.ends_with('0'));
        assert_eq!(CellId::from_token(&token).unwrap(), id);
        assert_eq!(token.parse::<CellId>().unwrap(), id);
    }

    #[test]
    fn test_face_token() {
        assert_eq!(CellId::from_face(0).to_token(), "1");
        assert_eq!(CellId::from_face(5).to_token(), "b");
        assert_eq!(CellId::from_raw(0).to_token(), "X");
    }

    #[test]
    fn test_invalid_tokens() {
        for token in ["", "X", "zz", "00000000000000000", "f", "0"] {
            assert!(
                matches!(CellId::from_token(token), Err(CoverError::InvalidToken(_))),
                "token '{}' should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_common_ancestor_level() {
        let id = CellId::from_lat_lng(&sf(), 20).unwrap();
        let other = CellId::from_lat_lng(&sf(), 10).unwrap();
        assert_eq!(id.common_ancestor_level(&other), Some(10));
        assert_eq!(id.common_ancestor_level(&id), Some(20));
        assert_eq!(
            CellId::from_face(0).common_ancestor_level(&CellId::from_face(1)),
            None
        );
    }

    #[test]
    fn test_vertices_surround_point() {
        let id = CellId::from_lat_lng(&sf(), 15).unwrap();
        let vertices = Cell::new(id).vertices();
        let lats: Vec<f64> = vertices.iter().map(|v| v.lat()).collect();
        let lngs: Vec<f64> = vertices.iter().map(|v| v.lng()).collect();
        let min_lat = lats.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_lat = lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_lng = lngs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_lng = lngs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(min_lat <= sf().lat() && sf().lat() <= max_lat);
        assert!(min_lng <= sf().lng() && sf().lng() <= max_lng);
    }

    #[test]
    fn test_edge_normals_point_inward() {
        let cell = Cell::new(CellId::from_lat_lng(&sf(), 6).unwrap());
        let center = cell.center();
        for k in 0..4 {
            assert!(cell.edge_normal(k).dot(&center) > 0.0);
        }
    }

    #[test]
    fn test_cap_bound_contains_vertices() {
        let cell = Cell::new(CellId::from_face(2));
        let cap = cell.cap_bound();
        for v in cell.vertex_vectors() {
            assert!(cap.contains_point(&v));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_point_in_own_cell(
                lat in -90.0..=90.0_f64,
                lng in -180.0..=180.0_f64,
                level in 0u8..=30
            ) {
                let point = LatLng::new(lat, lng).unwrap();
                let id = CellId::from_lat_lng(&point, level)?;
                prop_assert_eq!(id.level(), level);
                prop_assert!(id.is_valid());
                prop_assert!(Cell::new(id).contains_point(&point.to_vec3()));
            }

            #[test]
            fn test_parent_contains_child(
                lat in -90.0..=90.0_f64,
                lng in -180.0..=180.0_f64,
                level in 1u8..=30
            ) {
                let point = LatLng::new(lat, lng).unwrap();
                let id = CellId::from_lat_lng(&point, level)?;
                let parent = id.immediate_parent().unwrap();
                prop_assert!(parent.contains(&id));
                prop_assert!(parent.children().unwrap().contains(&id));
            }

            #[test]
            fn test_token_roundtrip_property(
                lat in -90.0..=90.0_f64,
                lng in -180.0..=180.0_f64,
                level in 0u8..=30
            ) {
                let point = LatLng::new(lat, lng).unwrap();
                let id = CellId::from_lat_lng(&point, level)?;
                prop_assert_eq!(CellId::from_token(&id.to_token())?, id);
            }
        }
    }
}
