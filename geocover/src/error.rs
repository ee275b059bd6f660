//! Error types for covering and intersection queries.

use thiserror::Error;

/// Errors produced by the covering engine and the query layer around it.
#[derive(Debug, Error)]
pub enum CoverError {
    /// GeoJSON payload could not be decoded.
    #[error("Invalid GeoJSON: {0}")]
    Decode(String),

    /// A request parameter was missing or not a valid number.
    #[error("Invalid parameter {name}: '{value}'")]
    Parameter { name: String, value: String },

    /// Polygon covering requested with `max_level < min_level`.
    #[error("Invalid level range: max_level {max_level} is below min_level {min_level}")]
    InvalidLevelRange { min_level: u8, max_level: u8 },

    /// Cell level outside 0..=30.
    #[error("Invalid cell level {0} (max: {max})", max = crate::cell::MAX_LEVEL)]
    InvalidLevel(i64),

    /// Hexagon resolution outside 0..=15.
    #[error("Invalid hexagon resolution {0} (max: {max})", max = crate::hex::MAX_RESOLUTION)]
    InvalidResolution(i64),

    /// Cap radius is negative or not finite.
    #[error("Invalid radius: {0} meters")]
    InvalidRadius(f64),

    /// Cap covering budget too small to hold one cell per cube face.
    #[error("Invalid cell budget {0} (min: {min})", min = crate::cell::NUM_FACES)]
    InvalidCellBudget(usize),

    /// Covering would need more cells than the configured limit.
    #[error("Covering needs more than {limit} cells; use a coarser level or resolution")]
    TooManyCells { limit: usize },

    /// Latitude/longitude outside the valid range or not finite.
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Geometry is structurally unusable (too few vertices, too large, ...).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Cell token could not be decoded.
    #[error("Invalid cell token: '{0}'")]
    InvalidToken(String),

    /// Hexagon set mixes resolutions where a single resolution is required.
    #[error("Hexagon set mixes resolutions {first} and {second}")]
    MixedResolution { first: u8, second: u8 },
}

impl CoverError {
    /// Create a parameter error for a named field.
    pub fn parameter(name: impl Into<String>, value: impl Into<String>) -> Self {
        CoverError::Parameter {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if the error was caused by the caller's input.
    ///
    /// Every variant except `InvalidToken` (only reachable through cell ids
    /// the engine produced itself) is a client error.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoverError::InvalidToken(_))
    }
}

/// Result type for covering operations.
pub type Result<T> = std::result::Result<T, CoverError>;
