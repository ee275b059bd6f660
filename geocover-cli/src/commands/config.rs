//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show`, and `config init`.

use std::path::Path;

use clap::Subcommand;
use geocover::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::load_config;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration as INI
    Show,

    /// Write the default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Init => run_init(config_path),
    }
}

/// Show the configuration file path.
fn run_path(config_path: Option<&Path>) -> Result<(), CliError> {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", config_file_path().display()),
    }
    Ok(())
}

/// Print the effective configuration (defaults filled in).
fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    print!("{}", config.to_ini_string());
    Ok(())
}

/// Create the config file with defaults.
fn run_init(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                ConfigFile::default().save_to(path)?;
            }
            path.to_path_buf()
        }
        None => ConfigFile::ensure_exists()?,
    };
    println!("Configuration file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_defaults_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");

        run_init(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(load_config(Some(&path)).unwrap(), ConfigFile::default());

        std::fs::write(&path, "[covering]\nmax_cap_cells = 12\n").unwrap();
        run_init(Some(&path)).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().covering.max_cap_cells, 12);
    }
}
