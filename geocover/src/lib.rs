//! GeoCover - spatial cell coverings over GeoJSON
//!
//! This library approximates points, polygons and circular regions on the
//! sphere with sets of discrete cells and answers intersection queries
//! against those sets. Two cell systems are provided:
//!
//! - [`cell`]: a hierarchical quad-tree index (six cube faces, levels 0-30,
//!   64-bit ids on a Hilbert curve)
//! - [`hex`]: a hierarchical hexagon grid (resolutions 0-15) with polygon
//!   fill and compaction
//!
//! [`covering`] builds cell sets for polygons, points and caps, and
//! [`query`] ties decoding, covering and intersection together for the
//! HTTP front end in [`server`].

pub mod cell;
pub mod config;
pub mod covering;
pub mod error;
pub mod geometry;
pub mod hex;
pub mod logging;
pub mod query;
pub mod region;
pub mod server;

pub use error::{CoverError, Result};

/// Crate version, reported by `/health` and the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
