//! Default values for all configuration settings.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use super::settings::*;
use crate::covering::DEFAULT_MAX_POLYGON_CELLS;
use crate::query::DEFAULT_MAX_CAP_CELLS;
use crate::region::DEFAULT_EARTH_RADIUS_KM;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "geocover.log";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Default listen address (`127.0.0.1:8080`).
pub fn default_listen_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                listen: default_listen_addr(),
            },
            covering: CoveringSettings {
                earth_radius_km: DEFAULT_EARTH_RADIUS_KM,
                max_cap_cells: DEFAULT_MAX_CAP_CELLS,
                max_polygon_cells: DEFAULT_MAX_POLYGON_CELLS,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}
