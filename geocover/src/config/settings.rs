//! Settings structs, one per `[section]` of the INI file.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::query::EngineConfig;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub covering: CoveringSettings,
    pub logging: LoggingSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Address the server binds to
    pub listen: SocketAddr,
}

/// Covering engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveringSettings {
    /// Earth radius used to convert circle radii to angles
    pub earth_radius_km: f64,
    /// Cell budget for circle coverings
    pub max_cap_cells: usize,
    /// Limit on the cells of one polygon covering or hexagon fill
    pub max_polygon_cells: usize,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
    /// Default level filter (overridden by `RUST_LOG`)
    pub level: String,
}

impl ConfigFile {
    /// Engine settings derived from the `[covering]` section.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            earth_radius_km: self.covering.earth_radius_km,
            max_cap_cells: self.covering.max_cap_cells,
            max_polygon_cells: self.covering.max_polygon_cells,
        }
    }
}
