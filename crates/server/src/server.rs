//! Router and listener.

use axum::{routing::get, Router};
use orbit_core::config::ServerConfig;
use orbit_core::{Error, Result};
use tracing::info;

use crate::handlers::{get_epoch, get_epoch_location, get_epoch_speed, get_now, list_epochs};
use crate::state::AppState;

/// All routes served by the tracker.
pub const ROUTES: &[&str] = &[
    "GET /epochs?limit=&offset=",
    "GET /epochs/{epoch}",
    "GET /epochs/{epoch}/speed",
    "GET /epochs/{epoch}/location",
    "GET /now",
];

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/epochs", get(list_epochs))
        .route("/epochs/:epoch", get(get_epoch))
        .route("/epochs/:epoch/speed", get(get_epoch_speed))
        .route("/epochs/:epoch/location", get(get_epoch_location))
        .route("/now", get(get_now))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("listening on {}", address);
    for route in ROUTES {
        info!("  {}", route);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Io)?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
