use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::catalog::ProductStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the product store named in the config (creating its directory) and
/// wrap it as handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let store = ProductStore::open(&cfg.catalog.data_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(ServerState::new(store))
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    cfg.server_address()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("{}: {e}", cfg.server_address())))
}

/// Public entry: build the app and run the HTTP server until Ctrl+C/SIGTERM.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(%addr, data_file = %cfg.catalog.data_file, "catalog server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;
    info!("server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C signal"),
        _ = terminate => info!("received SIGTERM signal"),
    }
}
