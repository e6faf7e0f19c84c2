//! Document sync server
//!
//! Serves the expense page and accepts whole-page uploads from it. Each
//! version of the page is identified by an etag; an upload must name the
//! version it was based on in `If-Match`, which catches a second tab or
//! device overwriting newer data.
//!
//! # Endpoints
//!
//! - `GET /` - Current page
//! - `HEAD /` - Etag of the current page
//! - `PUT /` - Upload a new page (`If-Match` required)
//! - anything else - Static assets next to the initial page (the page's
//!   script and wasm)
//!
//! With `[server.tls]` enabled the server speaks HTTPS only and requires a
//! client certificate from the configured CA (see [`tls`]).

pub mod document;
pub mod error;
pub mod routes;
pub mod state;
pub mod tls;

pub use document::{compute_etag, Document, DocumentStore};
pub use error::{SyncError, SyncResult};
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::{ServerConfig, TlsFiles};

/// Time open connections get to finish after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Build the sync router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;
    let assets = ServeDir::new(state.documents.assets_dir());
    let shared_state = Arc::new(state);

    Router::new()
        .route(
            "/",
            get(routes::get_document)
                .head(routes::head_document)
                .put(routes::put_document),
        )
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the sync server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), SyncError> {
    let tls = config
        .tls
        .resolve()
        .map_err(|e| SyncError::Tls(e.to_string()))?;
    let router = build_router(state);
    let addr = config.addr();

    match tls {
        Some(files) => serve_tls(router, &addr, &files).await?,
        None => {
            if !is_loopback(&config.host) {
                tracing::warn!(
                    "Serving {} without TLS; anyone reaching it can replace the page",
                    addr
                );
            }

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Ausgabenzettel listening on http://{}", addr);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .map_err(|e| SyncError::Internal(format!("Server error: {}", e)))?;
        }
    }

    tracing::info!("Ausgabenzettel shut down gracefully");
    Ok(())
}

async fn serve_tls(router: Router, addr: &str, files: &TlsFiles) -> Result<(), SyncError> {
    let rustls = tls::load(files).await?;
    let socket: SocketAddr = tokio::net::lookup_host(addr)
        .await?
        .next()
        .ok_or_else(|| SyncError::Internal(format!("{} resolves to no address", addr)))?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    tracing::info!(
        "Ausgabenzettel listening on https://{} (client certificate required)",
        socket
    );

    axum_server::bind_rustls(socket, rustls)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

/// Whether `host` only accepts local connections
fn is_loopback(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().map(|ip| ip.is_loopback()).unwrap_or(false)
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
