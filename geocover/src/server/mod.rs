//! HTTP front end for the covering engine.
//!
//! | Route | Method | Handler |
//! | --- | --- | --- |
//! | `/cover` | POST | hierarchical covering of points and polygons |
//! | `/cover/h3` | POST | hexagon fill and compaction of polygons |
//! | `/intersects` | POST | point and circle intersection test |
//! | `/health` | GET | liveness |
//!
//! POST bodies are `application/x-www-form-urlencoded`.

mod error;
mod handlers;

pub use error::{ErrorResponse, ServerError};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::query::EngineConfig;

/// State shared by all handlers. Read-only after start-up.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub engine: EngineConfig,
}

impl AppState {
    pub fn new(engine: EngineConfig) -> Self {
        Self { engine }
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/cover", post(handlers::cover))
        .route("/cover/h3", post(handlers::cover_hex))
        .route("/intersects", post(handlers::intersects))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server bound to one address.
pub struct Server {
    addr: SocketAddr,
    router: Router,
}

impl Server {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self {
            addr,
            router: build_router(state),
        }
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        let addr = listener.local_addr()?;
        info!(addr = %addr, version = crate::VERSION, "GeoCover server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("GeoCover server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
