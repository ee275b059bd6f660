//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[server]
; Address the HTTP server binds to
listen = {}

[covering]
; Earth radius (km) used to convert circle radii in metres to angles
earth_radius_km = {}
; Maximum number of cells in a circle covering
max_cap_cells = {}
; Maximum number of cells in one polygon covering or hexagon fill
max_polygon_cells = {}

[logging]
; Log directory (relative paths are resolved from the working directory)
directory = {}
file = {}
; One of: trace, debug, info, warn, error (RUST_LOG overrides)
level = {}
"#,
        config.server.listen,
        config.covering.earth_radius_km,
        config.covering.max_cap_cells,
        config.covering.max_polygon_cells,
        config.logging.directory.to_string_lossy(),
        config.logging.file,
        config.logging.level,
    )
}
