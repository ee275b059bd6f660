//! Cell coverings and the intersection tests between them.
//!
//! A [`Covering`] is a set of hierarchical cells kept sorted by id with
//! duplicates and nested cells removed. Because every cell owns the
//! contiguous leaf range `[range_min, range_max]`, the sorted cells form a
//! list of disjoint, ascending ranges and all lookups are binary searches.

mod coverer;

pub use coverer::{cover_cap, cover_point, cover_polygon, PointCovering, PolygonCovering};

use crate::cell::{Cell, CellId};
use crate::geometry::{LatLng, Vec3};

/// Default limit on the cells a single polygon covering or hexagon fill may
/// produce.
pub const DEFAULT_MAX_POLYGON_CELLS: usize = 250_000;

/// A set of non-overlapping cells sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Covering {
    cells: Vec<CellId>,
}

impl Covering {
    /// Build a covering from arbitrary cells.
    ///
    /// Cells are sorted, duplicates are dropped and cells contained in
    /// another cell of the input are removed. Complete sibling groups are
    /// left alone; see [`Covering::normalize`].
    pub fn new(mut cells: Vec<CellId>) -> Self {
        cells.sort_unstable();
        let mut out: Vec<CellId> = Vec::with_capacity(cells.len());
        for id in cells {
            if out.last().is_some_and(|last| last.contains(&id)) {
                continue;
            }
            while out.last().is_some_and(|last| id.contains(last)) {
                out.pop();
            }
            out.push(id);
        }
        Self { cells: out }
    }

    /// The cells in ascending id order.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<CellId> {
        self.cells
    }

    /// Replace every complete group of 4 siblings by their parent,
    /// repeatedly, so that the covering uses the fewest cells for the same
    /// area.
    pub fn normalize(&mut self) {
        let mut out: Vec<CellId> = Vec::with_capacity(self.cells.len());
        for &cell in &self.cells {
            let mut id = cell;
            while out.len() >= 3 {
                let Some(parent) = completed_parent(&out[out.len() - 3..], id) else {
                    break;
                };
                out.truncate(out.len() - 3);
                id = parent;
            }
            out.push(id);
        }
        self.cells = out;
    }

    /// Coarsen the covering until it holds at most `max_cells` cells.
    ///
    /// Each step replaces the adjacent pair of cells with the deepest common
    /// ancestor by that ancestor. Cells on different cube faces share no
    /// ancestor, so `max_cells` is only reached when it is at least the
    /// number of faces spanned; 6 always suffices.
    pub fn reduce_to(&mut self, max_cells: usize) {
        while self.cells.len() > max_cells {
            let best = self
                .cells
                .windows(2)
                .filter_map(|pair| pair[0].common_ancestor_level(&pair[1]).map(|l| (l, pair[0])))
                .max_by_key(|(level, _)| *level);

            let Some((level, cell)) = best else {
                break;
            };
            let mut cells = std::mem::take(&mut self.cells);
            cells.push(cell.parent(level));
            *self = Covering::new(cells);
            self.normalize();
        }
    }

    /// Returns true if some cell of the covering intersects `id`
    /// (`IntersectsCell`).
    pub fn intersects_cell(&self, id: CellId) -> bool {
        let i = self.cells.partition_point(|c| *c < id);
        if i < self.cells.len() && self.cells[i].range_min() <= id.range_max() {
            return true;
        }
        i > 0 && self.cells[i - 1].range_max() >= id.range_min()
    }

    /// Returns true if some cell of the covering contains `id`.
    pub fn contains_cell(&self, id: CellId) -> bool {
        let i = self.cells.partition_point(|c| *c < id);
        if i < self.cells.len() && self.cells[i].range_min() <= id {
            return true;
        }
        i > 0 && self.cells[i - 1].range_max() >= id
    }

    /// Returns true if the leaf cell of the point is covered.
    pub fn contains_point(&self, p: &Vec3) -> bool {
        self.contains_cell(CellId::from_point(p))
    }

    /// Returns true if any cell of `self` intersects any cell of `other`
    /// (`Intersects`).
    pub fn intersects(&self, other: &Covering) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.cells.iter().any(|id| large.intersects_cell(*id))
    }

    /// Tokens of the cells, in id order.
    pub fn tokens(&self) -> Vec<String> {
        self.cells.iter().map(CellId::to_token).collect()
    }

    /// Corner points of every cell, in id order.
    pub fn vertex_sets(&self) -> Vec<[LatLng; 4]> {
        self.cells.iter().map(|id| Cell::new(*id).vertices()).collect()
    }
}

impl FromIterator<CellId> for Covering {
    fn from_iter<I: IntoIterator<Item = CellId>>(iter: I) -> Self {
        Covering::new(iter.into_iter().collect())
    }
}

/// The parent of `id` if `prev` holds its first 3 siblings and `id` is the
/// fourth.
fn completed_parent(prev: &[CellId], id: CellId) -> Option<CellId> {
    let parent = id.immediate_parent()?;
    let children = parent.children()?;
    (children[3] == id && prev == &children[..3]).then_some(parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_at(lat: f64, lng: f64, level: u8) -> CellId {
        CellId::from_lat_lng(&LatLng::new(lat, lng).unwrap(), level).unwrap()
    }

    #[test]
    fn test_new_sorts_and_drops_nested_cells() {
        let parent = cell_at(10.0, 10.0, 8);
        let child = cell_at(10.0, 10.0, 12);
        let other = cell_at(-40.0, 120.0, 8);
        let covering = Covering::new(vec![child, other, parent, child]);

        let mut expected = vec![parent, other];
        expected.sort();
        assert_eq!(covering.cells(), expected.as_slice());
    }

    #[test]
    fn test_normalize_merges_complete_sibling_groups() {
        let parent = cell_at(10.0, 10.0, 8);
        let grandchildren: Vec<CellId> = parent
            .children()
            .unwrap()
            .iter()
            .flat_map(|c| c.children().unwrap())
            .collect();
        let mut covering = Covering::new(grandchildren);
        assert_eq!(covering.len(), 16);
        covering.normalize();
        assert_eq!(covering.cells(), &[parent]);
    }

    #[test]
    fn test_normalize_keeps_incomplete_groups() {
        let parent = cell_at(10.0, 10.0, 8);
        let children = parent.children().unwrap();
        let mut covering = Covering::new(children[..3].to_vec());
        covering.normalize();
        assert_eq!(covering.len(), 3);
    }

    #[test]
    fn test_intersects_cell() {
        let covering = Covering::new(vec![cell_at(10.0, 10.0, 8)]);
        assert!(covering.intersects_cell(cell_at(10.0, 10.0, 15)));
        assert!(covering.intersects_cell(cell_at(10.0, 10.0, 3)));
        assert!(!covering.intersects_cell(cell_at(-10.0, -10.0, 8)));
    }

    #[test]
    fn test_contains_cell_only_for_descendants() {
        let covering = Covering::new(vec![cell_at(10.0, 10.0, 8)]);
        assert!(covering.contains_cell(cell_at(10.0, 10.0, 8)));
        assert!(covering.contains_cell(cell_at(10.0, 10.0, 20)));
        assert!(!covering.contains_cell(cell_at(10.0, 10.0, 3)));
        assert!(covering.contains_point(&LatLng::new(10.0, 10.0).unwrap().to_vec3()));
    }

    #[test]
    fn test_intersects_between_coverings() {
        let a = Covering::new(vec![cell_at(10.0, 10.0, 6), cell_at(50.0, 50.0, 6)]);
        let b = Covering::new(vec![cell_at(50.0, 50.0, 12)]);
        let c = Covering::new(vec![cell_at(-50.0, -50.0, 12)]);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!Covering::default().intersects(&a));
    }

    #[test]
    fn test_reduce_to_budget() {
        let cells: Vec<CellId> = (0..10)
            .map(|k| cell_at(10.0 + k as f64 * 0.5, 10.0, 12))
            .collect();
        let mut covering = Covering::new(cells.clone());
        covering.reduce_to(3);
        assert!(covering.len() <= 3);
        for id in cells {
            assert!(covering.contains_cell(id));
        }
    }

    #[test]
    fn test_reduce_to_cannot_merge_faces() {
        let faces: Vec<CellId> = (0..6).map(CellId::from_face).collect();
        let mut covering = Covering::new(faces);
        covering.reduce_to(2);
        assert_eq!(covering.len(), 6);
    }

    #[test]
    fn test_tokens_in_id_order() {
        let a = cell_at(10.0, 10.0, 8);
        let b = cell_at(-40.0, 120.0, 8);
        let covering: Covering = vec![a, b].into_iter().collect();
        let tokens = covering.tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], covering.cells()[0].to_token());
        assert_eq!(covering.vertex_sets().len(), 2);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_cells() -> impl Strategy<Value = Vec<CellId>> {
            prop::collection::vec((-60.0..60.0_f64, -170.0..170.0_f64, 2u8..14), 1..12).prop_map(
                |points| {
                    points
                        .into_iter()
                        .map(|(lat, lng, level)| cell_at(lat, lng, level))
                        .collect()
                },
            )
        }

        proptest! {
            #[test]
            fn test_intersects_is_symmetric(a in arb_cells(), b in arb_cells()) {
                let a = Covering::new(a);
                let b = Covering::new(b);
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            }

            #[test]
            fn test_intersects_cell_matches_linear_scan(a in arb_cells(), b in arb_cells()) {
                let covering = Covering::new(a);
                for id in b {
                    let expected = covering.cells().iter().any(|c| c.intersects(&id));
                    prop_assert_eq!(covering.intersects_cell(id), expected);
                }
            }

            #[test]
            fn test_intersects_cell_matches_single_cell_covering(
                a in arb_cells(),
                b in arb_cells()
            ) {
                let covering = Covering::new(a);
                for id in b {
                    prop_assert_eq!(
                        covering.intersects_cell(id),
                        covering.intersects(&Covering::new(vec![id]))
                    );
                }
            }

            #[test]
            fn test_cells_are_disjoint_and_sorted(a in arb_cells()) {
                let covering = Covering::new(a);
                for pair in covering.cells().windows(2) {
                    prop_assert!(pair[0] < pair[1]);
                    prop_assert!(pair[0].range_max() < pair[1].range_min());
                }
            }
        }
    }
}
