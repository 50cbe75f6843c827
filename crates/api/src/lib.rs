pub mod payload;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use common::{Notifier, Result};
use strategy::SignalEngine;

pub use payload::{RequestDefaults, SignalRequest};
pub use routes::webhook::process_signal;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SignalEngine>,
    pub notifier: Arc<dyn Notifier>,
    /// Symbol and timeframe used when a payload omits them.
    pub defaults: RequestDefaults,
}

/// All routes with state and request tracing attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_router())
        .merge(routes::webhook_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Build and run the webhook server until the listener fails.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Webhook server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
