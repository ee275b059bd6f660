//! Configuration for the GeoCover server and CLI.
//!
//! Settings live in `~/.geocover/config.ini`:
//!
//! ```ini
//! [server]
//! listen = 127.0.0.1:8080
//!
//! [covering]
//! earth_radius_km = 6371.01
//! max_cap_cells = 300
//! max_polygon_cells = 250000
//!
//! [logging]
//! directory = logs
//! file = geocover.log
//! level = info
//! ```
//!
//! A missing file yields the defaults. Values are read once at start-up.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, CoveringSettings, LoggingSettings, ServerSettings};
