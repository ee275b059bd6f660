//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geocover::config::ConfigFileError;
use geocover::CoverError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to read the GeoJSON input
    InputRead { path: String, error: std::io::Error },
    /// Covering or intersection query failed
    Query(CoverError),
    /// Failed to serialize the response
    Output(serde_json::Error),
    /// HTTP server error
    Serve(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Serve(_) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Address in use: pick another port with --listen");
                eprintln!("  2. Privileged port: ports below 1024 need elevated rights");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or run 'geocover config init' to write a fresh one.",
                    geocover::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InputRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path, error)
            }
            CliError::Query(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to write response: {}", e),
            CliError::Serve(e) => write!(f, "HTTP server error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::InputRead { error, .. } => Some(error),
            CliError::Query(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Serve(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoverError> for CliError {
    fn from(e: CoverError) -> Self {
        CliError::Query(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
