use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::{debug, error, info, warn};

use norma_auth::TokenBlocklist;

use norma::logging::{init_tracing, shutdown_tracer};
use norma::metrics::{init_metrics, metrics_app};
use norma::router::init_router;
use norma::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = ?e, "Server stopped with an error");
        shutdown_tracer().await;
        std::process::exit(1);
    }

    shutdown_tracer().await;
}

async fn run() -> anyhow::Result<()> {
    let state = init_app_state().await?;
    let server_config = state.server_config.clone();

    match init_metrics() {
        Ok(Some(handle)) => {
            let address = server_config.metrics_address();
            let listener = tokio::net::TcpListener::bind(&address).await?;
            info!("Metrics available at http://{}/metrics", address);
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                    error!(error = %e, "Metrics server stopped");
                }
            });
        }
        Ok(None) => info!("Metrics disabled"),
        Err(e) => warn!(error = %e, "Failed to install metrics recorder"),
    }

    spawn_blocklist_purge(state.blocklist.clone());

    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🚀 Server running on http://{}", address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    info!("📖 Scalar UI available at http://{}/scalar", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

const BLOCKLIST_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Periodically drops revocations of tokens that have expired anyway.
fn spawn_blocklist_purge(blocklist: TokenBlocklist) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(BLOCKLIST_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = blocklist.purge_expired();
            if purged > 0 {
                debug!(purged, remaining = blocklist.len(), "Purged expired token revocations");
            }
        }
    });
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
