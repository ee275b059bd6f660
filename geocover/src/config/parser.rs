//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::defaults::LOG_LEVELS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::cell::NUM_FACES;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("listen") {
            config.server.listen = v.trim().parse().map_err(|_| {
                invalid("server", "listen", v, "expected host:port like '127.0.0.1:8080'")
            })?;
        }
    }

    // [covering] section
    if let Some(section) = ini.section(Some("covering")) {
        if let Some(v) = section.get("earth_radius_km") {
            config.covering.earth_radius_km = match v.trim().parse::<f64>() {
                Ok(r) if r.is_finite() && r > 0.0 => r,
                _ => {
                    return Err(invalid(
                        "covering",
                        "earth_radius_km",
                        v,
                        "must be a positive number of kilometres",
                    ))
                }
            };
        }
        if let Some(v) = section.get("max_cap_cells") {
            config.covering.max_cap_cells = match v.trim().parse::<usize>() {
                Ok(n) if n >= NUM_FACES as usize => n,
                _ => {
                    return Err(invalid(
                        "covering",
                        "max_cap_cells",
                        v,
                        "must be an integer of at least 6",
                    ))
                }
            };
        }
        if let Some(v) = section.get("max_polygon_cells") {
            config.covering.max_polygon_cells = match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "covering",
                        "max_polygon_cells",
                        v,
                        "must be a positive integer",
                    ))
                }
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
        if let Some(v) = section.get("level") {
            let v = v.trim().to_lowercase();
            if !LOG_LEVELS.contains(&v.as_str()) {
                return Err(invalid(
                    "logging",
                    "level",
                    &v,
                    "must be one of: trace, debug, info, warn, error",
                ));
            }
            config.logging.level = v;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
