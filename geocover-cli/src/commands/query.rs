//! One-shot query commands: cover, hex and intersects.
//!
//! Each reads a GeoJSON document from a file (or stdin for `-`) and prints
//! the same JSON document the matching HTTP route returns.

use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;

use geocover::query::{
    check_intersection, cover_geojson, cover_hex_geojson, decode_geojson, CoverParams,
    IntersectParams,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the cover command.
pub struct CoverArgs {
    pub input: String,
    pub max_level: u8,
    pub min_level: u8,
}

/// Arguments for the hex command.
pub struct HexArgs {
    pub input: String,
    pub resolution: u8,
}

/// Arguments for the intersects command.
pub struct IntersectsArgs {
    pub input: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    pub max_level: u8,
    pub min_level: u8,
    pub max_level_circle: u8,
}

/// Run the cover command.
pub fn run_cover(config_path: Option<&Path>, args: CoverArgs) -> Result<(), CliError> {
    let runner = CliRunner::for_query(config_path)?;
    runner.log_startup("cover");
    let engine = runner.config().engine_config();

    let params = CoverParams {
        geojson: read_input(&args.input)?,
        max_level: args.max_level,
        min_level: args.min_level,
    };
    let features = decode_geojson(&params.geojson)?;
    print_json(&cover_geojson(&features, &params, &engine)?)
}

/// Run the hex command.
pub fn run_hex(config_path: Option<&Path>, args: HexArgs) -> Result<(), CliError> {
    let runner = CliRunner::for_query(config_path)?;
    runner.log_startup("hex");
    let engine = runner.config().engine_config();

    let features = decode_geojson(&read_input(&args.input)?)?;
    print_json(&cover_hex_geojson(&features, args.resolution, &engine)?)
}

/// Run the intersects command.
pub fn run_intersects(config_path: Option<&Path>, args: IntersectsArgs) -> Result<(), CliError> {
    let runner = CliRunner::for_query(config_path)?;
    runner.log_startup("intersects");
    let engine = runner.config().engine_config();

    let params = IntersectParams {
        geojson: read_input(&args.input)?,
        lat: args.lat,
        lng: args.lng,
        radius: args.radius,
        max_level: args.max_level,
        min_level: args.min_level,
        max_level_circle: args.max_level_circle,
    };
    let features = decode_geojson(&params.geojson)?;
    print_json(&check_intersection(&features, &params, &engine)?)
}

/// Read the whole input, from stdin when `input` is `-`.
fn read_input(input: &str) -> Result<String, CliError> {
    let read_error = |error| CliError::InputRead {
        path: input.to_string(),
        error,
    };

    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(read_error)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).map_err(read_error)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout).map_err(|e| CliError::Output(serde_json::Error::io(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "Point", "coordinates": [1, 2]}}"#).unwrap();

        let text = read_input(file.path().to_str().unwrap()).unwrap();
        assert!(decode_geojson(&text).is_ok());
    }

    #[test]
    fn test_read_input_missing_file() {
        let result = read_input("/nonexistent/area.geojson");
        assert!(matches!(result, Err(CliError::InputRead { .. })));
    }
}
