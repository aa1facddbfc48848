use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::connector::api::Container;

use super::handlers::{ask, health, index, transcript, AppState};
use super::page::PageRenderer;
use super::session_registry::SessionRegistry;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub fn build_state(container: Arc<Container>) -> Result<Arc<AppState>> {
    Ok(Arc::new(AppState {
        registry: SessionRegistry::new(container),
        renderer: PageRenderer::new().context("Failed to compile page template")?,
    }))
}

/// Build the axum app serving the single page and its JSON companions.
pub fn build_router(container: Arc<Container>) -> Result<Router> {
    Ok(router(build_state(container)?))
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/api/transcript", get(transcript))
        .route("/health", get(health))
        .with_state(state)
}

/// Periodically drop idle sessions. Must be called from within a tokio runtime.
pub fn start_session_sweeper(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            state.registry.sweep_idle().await;
            debug!("Active chat sessions: {}", state.registry.len().await);
        }
    })
}

/// Serve until Ctrl-C.
pub async fn serve(container: Arc<Container>, port: u16, public: bool) -> Result<()> {
    let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
    let addr = SocketAddr::from((host, port));

    let state = build_state(container)?;
    let sweeper = start_session_sweeper(state.clone(), SWEEP_INTERVAL);
    let app = router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Serving on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    sweeper.abort();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
