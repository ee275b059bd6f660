//! Hexagonal grid index with aperture-7 refinement.
//!
//! The grid is a hexagonal lattice laid over the equirectangular
//! (longitude, latitude) plane. At resolution 0 cell centres are 18° apart;
//! every finer resolution divides the spacing by √7 and rotates the lattice
//! by ±19.1°, alternating, so that each cell has exactly 7 children.
//!
//! Identifiers pack the resolution and the two lattice coordinates into 64
//! bits:
//!
//! ```text
//!  63  60 59  56 55                      28 27                       0
//! ┌──────┬──────┬──────────────────────────┬──────────────────────────┐
//! │ 0x8  │ res  │ a + 2^27                 │ b + 2^27                 │
//! └──────┴──────┴──────────────────────────┴──────────────────────────┘
//! ```

mod fill;
mod lattice;

pub use fill::{compact, polyfill, uncompact};

use std::fmt;
use std::str::FromStr;

use crate::error::{CoverError, Result};
use crate::geometry::LatLng;

use lattice::{cdiv, cmul, scale, step, Eisenstein, UNITS};

/// Finest hexagon resolution.
pub const MAX_RESOLUTION: u8 = 15;

/// Distance between resolution-0 cell centres, in degrees.
const BASE_SPACING_DEG: f64 = 18.0;

const ID_MODE: u64 = 0x8;
const COORD_BITS: u32 = 28;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;
const COORD_OFFSET: i64 = 1 << (COORD_BITS - 1);

/// Distance from a cell centre to its vertices, in lattice units.
const CIRCUMRADIUS: f64 = 0.577_350_269_189_625_8;

/// A cell of the hexagonal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexCell {
    resolution: u8,
    coord: Eisenstein,
}

impl HexCell {
    /// The cell at `resolution` whose hexagon contains the point.
    ///
    /// # Errors
    ///
    /// Returns `CoverError::InvalidResolution` if `resolution > 15`.
    pub fn from_lat_lng(point: &LatLng, resolution: u8) -> Result<Self> {
        check_resolution(resolution)?;
        let (x, y) = to_lattice_plane(point.lng(), point.lat(), resolution);
        Ok(Self {
            resolution,
            coord: Eisenstein::round(x, y),
        })
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Packed 64-bit identifier.
    pub fn id(&self) -> u64 {
        let a = (self.coord.a + COORD_OFFSET) as u64 & COORD_MASK;
        let b = (self.coord.b + COORD_OFFSET) as u64 & COORD_MASK;
        (ID_MODE << 60) | ((self.resolution as u64) << 56) | (a << COORD_BITS) | b
    }

    /// Decode a packed identifier.
    pub fn from_id(id: u64) -> Option<Self> {
        if id >> 60 != ID_MODE {
            return None;
        }
        let resolution = ((id >> 56) & 0xf) as u8;
        if resolution > MAX_RESOLUTION {
            return None;
        }
        let a = ((id >> COORD_BITS) & COORD_MASK) as i64 - COORD_OFFSET;
        let b = (id & COORD_MASK) as i64 - COORD_OFFSET;
        Some(Self {
            resolution,
            coord: Eisenstein::new(a, b),
        })
    }

    /// Centre of the cell as (longitude, latitude), unclamped.
    pub(crate) fn plane_position(&self) -> (f64, f64) {
        from_lattice_plane(self.coord.to_complex(), self.resolution)
    }

    /// Centre of the cell.
    pub fn center(&self) -> LatLng {
        let (lng, lat) = self.plane_position();
        LatLng::clamped(lat, lng)
    }

    /// The 6 corners, counter-clockwise (`HexToPolygonCoordinates`).
    pub fn boundary(&self) -> Vec<LatLng> {
        let (cx, cy) = self.coord.to_complex();
        (0..6)
            .map(|k| {
                let angle = (30.0 + 60.0 * k as f64).to_radians();
                let vertex = (
                    cx + CIRCUMRADIUS * angle.cos(),
                    cy + CIRCUMRADIUS * angle.sin(),
                );
                let (lng, lat) = from_lattice_plane(vertex, self.resolution);
                LatLng::clamped(lat, lng)
            })
            .collect()
    }

    /// The cell one resolution coarser containing this one, `None` at
    /// resolution 0.
    pub fn parent(&self) -> Option<HexCell> {
        if self.resolution == 0 {
            return None;
        }
        Some(Self {
            resolution: self.resolution - 1,
            coord: self.coord.div_round(step(self.resolution)),
        })
    }

    /// The 7 cells one resolution finer, centre child first. `None` at the
    /// finest resolution.
    pub fn children(&self) -> Option<[HexCell; 7]> {
        if self.resolution >= MAX_RESOLUTION {
            return None;
        }
        let resolution = self.resolution + 1;
        let center = self.coord * step(resolution);
        let mut children = [HexCell {
            resolution,
            coord: center,
        }; 7];
        for (child, unit) in children[1..].iter_mut().zip(UNITS) {
            child.coord = center + unit;
        }
        Some(children)
    }

    /// The 6 adjacent cells at the same resolution, counter-clockwise.
    pub fn neighbors(&self) -> [HexCell; 6] {
        UNITS.map(|unit| HexCell {
            resolution: self.resolution,
            coord: self.coord + unit,
        })
    }
}

impl fmt::Display for HexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.id())
    }
}

impl FromStr for HexCell {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoverError::InvalidToken(s.to_string());
        if s.len() != 16 {
            return Err(invalid());
        }
        let id = u64::from_str_radix(s, 16).map_err(|_| invalid())?;
        HexCell::from_id(id).ok_or_else(invalid)
    }
}

/// Validate a resolution received from outside the engine.
pub(crate) fn check_resolution(resolution: u8) -> Result<()> {
    if resolution > MAX_RESOLUTION {
        return Err(CoverError::InvalidResolution(resolution as i64));
    }
    Ok(())
}

/// Map (longitude, latitude) degrees into lattice units at `resolution`.
pub(crate) fn to_lattice_plane(lng: f64, lat: f64, resolution: u8) -> (f64, f64) {
    let unit = (lng / BASE_SPACING_DEG, lat / BASE_SPACING_DEG);
    cmul(unit, scale(resolution).to_complex())
}

/// Inverse of [`to_lattice_plane`].
fn from_lattice_plane(position: (f64, f64), resolution: u8) -> (f64, f64) {
    let (x, y) = cdiv(position, scale(resolution).to_complex());
    (x * BASE_SPACING_DEG, y * BASE_SPACING_DEG)
}
