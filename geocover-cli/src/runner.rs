//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging once per command.

use std::path::Path;

use tracing::info;

use geocover::config::ConfigFile;
use geocover::logging::{init_console_logging, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps the file writer alive while the runner exists
    #[allow(dead_code)]
    logging_guard: Option<LoggingGuard>,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Runner for the long-lived server: logs to file and stdout.
    pub fn for_server(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            &config.logging.level,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard: Some(guard),
            config,
        })
    }

    /// Runner for one-shot commands: logs to stderr so stdout stays JSON.
    pub fn for_query(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        init_console_logging(&config.logging.level);

        Ok(Self {
            logging_guard: None,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GeoCover v{}", geocover::VERSION);
        info!("GeoCover CLI: {} command", command);
    }
}

/// Load the config file, or defaults when it does not exist.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}
