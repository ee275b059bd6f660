//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`query`] - One-shot coverings and intersection tests over a GeoJSON file
//! - [`serve`] - HTTP server

pub mod config;
pub mod query;
pub mod serve;
