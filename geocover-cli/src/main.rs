//! GeoCover CLI - Command-line interface
//!
//! Runs the HTTP server or answers single covering and intersection queries
//! over a GeoJSON file.

mod commands;
mod error;
mod runner;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::query::{CoverArgs, HexArgs, IntersectsArgs};
use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "geocover")]
#[command(version, about = "Spatial cell coverings and intersection queries over GeoJSON", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.geocover/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind, overriding the config file
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Cover the polygons and points of a GeoJSON file with cells
    Cover {
        /// GeoJSON file, or - for stdin
        input: String,

        /// Finest cell level (0-30)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=30))]
        max_level: u8,

        /// Coarsest cell level (0-30)
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=30))]
        min_level: u8,
    },

    /// Fill the polygons of a GeoJSON file with compacted hexagons
    Hex {
        /// GeoJSON file, or - for stdin
        input: String,

        /// Hexagon resolution (0-15)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=15))]
        resolution: u8,
    },

    /// Test a GeoJSON file against a point and a circle around it
    Intersects {
        /// GeoJSON file, or - for stdin
        input: String,

        /// Latitude of the point in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the point in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Circle radius in metres
        #[arg(long)]
        radius: f64,

        /// Finest cell level for the GeoJSON covering (0-30)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=30))]
        max_level: u8,

        /// Coarsest cell level for the GeoJSON covering (0-30)
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=30))]
        min_level: u8,

        /// Finest cell level for the circle covering (0-30)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=30))]
        max_level_circle: u8,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { listen } => commands::serve::run(ServeArgs {
            config_path,
            listen,
        }),
        Commands::Cover {
            input,
            max_level,
            min_level,
        } => commands::query::run_cover(
            config_path,
            CoverArgs {
                input,
                max_level,
                min_level,
            },
        ),
        Commands::Hex { input, resolution } => {
            commands::query::run_hex(config_path, HexArgs { input, resolution })
        }
        Commands::Intersects {
            input,
            lat,
            lng,
            radius,
            max_level,
            min_level,
            max_level_circle,
        } => commands::query::run_intersects(
            config_path,
            IntersectsArgs {
                input,
                lat,
                lng,
                radius,
                max_level,
                min_level,
                max_level_circle,
            },
        ),
        Commands::Config { command } => commands::config::run(command, config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_intersects_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "geocover",
            "intersects",
            "area.geojson",
            "--lat",
            "37.77",
            "--lng",
            "-122.42",
            "--radius",
            "1000",
            "--max-level",
            "12",
            "--max-level-circle",
            "14",
        ])
        .unwrap();

        let Commands::Intersects { lng, min_level, .. } = cli.command else {
            panic!("expected intersects");
        };
        assert_eq!(lng, -122.42);
        assert_eq!(min_level, 0);
    }

    #[test]
    fn test_level_out_of_range_rejected() {
        let result = Cli::try_parse_from(["geocover", "cover", "a.json", "--max-level", "31"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["geocover", "config", "show", "--config", "/tmp/g.ini"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g.ini")));
    }
}
