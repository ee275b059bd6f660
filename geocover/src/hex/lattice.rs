//! Eisenstein-integer arithmetic for the hexagonal lattice.
//!
//! Lattice points are `a + bω` with `ω = e^(iπ/3)`, i.e. the axial
//! coordinates of a pointy-top hex grid with unit spacing. Refining one
//! resolution multiplies every coordinate by a number of norm 7, so each
//! cell has exactly 7 children: the scaled centre and its 6 neighbours.

use std::ops::{Add, Mul};

const SQRT3: f64 = 1.732_050_807_568_877_2;

/// An Eisenstein integer `a + bω`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Eisenstein {
    pub a: i64,
    pub b: i64,
}

/// The 6 units, counter-clockwise from 1.
pub(crate) const UNITS: [Eisenstein; 6] = [
    Eisenstein::new(1, 0),
    Eisenstein::new(0, 1),
    Eisenstein::new(-1, 1),
    Eisenstein::new(-1, 0),
    Eisenstein::new(0, -1),
    Eisenstein::new(1, -1),
];

impl Eisenstein {
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    pub fn conj(self) -> Self {
        Self::new(self.a + self.b, -self.b)
    }

    /// Squared magnitude, `a² + ab + b²`.
    pub fn norm(self) -> i64 {
        self.a * self.a + self.a * self.b + self.b * self.b
    }

    /// Position in the complex plane.
    pub fn to_complex(self) -> (f64, f64) {
        let (a, b) = (self.a as f64, self.b as f64);
        (a + b / 2.0, b * SQRT3 / 2.0)
    }

    /// Nearest lattice point to a position in the complex plane.
    pub fn round(x: f64, y: f64) -> Self {
        let (a, b) = to_axial(x, y);
        let c = -a - b;
        let (mut ra, mut rb, rc) = (a.round(), b.round(), c.round());
        let (da, db, dc) = ((ra - a).abs(), (rb - b).abs(), (rc - c).abs());
        if da > db && da > dc {
            ra = -rb - rc;
        } else if db > dc {
            rb = -ra - rc;
        }
        Self::new(ra as i64, rb as i64)
    }

    /// Nearest lattice point to `self / divisor`.
    pub fn div_round(self, divisor: Eisenstein) -> Self {
        let n = divisor.norm() as f64;
        let (x, y) = (self * divisor.conj()).to_complex();
        Self::round(x / n, y / n)
    }
}

impl Add for Eisenstein {
    type Output = Eisenstein;

    fn add(self, o: Eisenstein) -> Eisenstein {
        Eisenstein::new(self.a + o.a, self.b + o.b)
    }
}

impl Mul for Eisenstein {
    type Output = Eisenstein;

    // ω² = ω - 1
    fn mul(self, o: Eisenstein) -> Eisenstein {
        Eisenstein::new(
            self.a * o.a - self.b * o.b,
            self.a * o.b + self.b * o.a + self.b * o.b,
        )
    }
}

/// Fractional axial coordinates of a position in the complex plane.
pub(crate) fn to_axial(x: f64, y: f64) -> (f64, f64) {
    let b = y * 2.0 / SQRT3;
    (x - b / 2.0, b)
}

/// Multiplier that refines `resolution - 1` into `resolution`.
///
/// Alternates between `2 + ω` and `3 - ω` so the grid orientation swings
/// back and forth by about 19° instead of drifting.
pub(crate) fn step(resolution: u8) -> Eisenstein {
    if resolution % 2 == 1 {
        Eisenstein::new(2, 1)
    } else {
        Eisenstein::new(3, -1)
    }
}

/// Product of all steps from resolution 0 up to `resolution`.
pub(crate) fn scale(resolution: u8) -> Eisenstein {
    (1..=resolution).fold(Eisenstein::new(1, 0), |acc, r| acc * step(r))
}

/// Complex product.
pub(crate) fn cmul((x, y): (f64, f64), (c, d): (f64, f64)) -> (f64, f64) {
    (x * c - y * d, x * d + y * c)
}

/// Complex quotient.
pub(crate) fn cdiv((x, y): (f64, f64), (c, d): (f64, f64)) -> (f64, f64) {
    let n = c * c + d * d;
    ((x * c + y * d) / n, (y * c - x * d) / n)
}
