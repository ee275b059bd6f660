//! Serve command - run the HTTP front end.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use geocover::server::{AppState, Server};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs<'a> {
    pub config_path: Option<&'a Path>,
    pub listen: Option<SocketAddr>,
}

/// Run the serve command.
pub fn run(args: ServeArgs<'_>) -> Result<(), CliError> {
    let runner = CliRunner::for_server(args.config_path)?;
    runner.log_startup("serve");
    let config = runner.config();

    // CLI takes precedence, then config
    let addr = args.listen.unwrap_or(config.server.listen);
    let engine = config.engine_config();
    info!(
        earth_radius_km = engine.earth_radius_km,
        max_cap_cells = engine.max_cap_cells,
        max_polygon_cells = engine.max_polygon_cells,
        "Engine configured"
    );

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Serve)?;
    let server = Server::new(addr, Arc::new(AppState::new(engine)));
    runtime.block_on(server.run()).map_err(CliError::Serve)
}
