mod config;
mod http;
mod state;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use config::Settings;
use http::router::build_router;
use state::AppState;
use storage::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new().context("Failed to load configuration")?;

    let store = Store::new(Some(settings.seed.path.as_str())).await?;

    let (tx_cmd, rx_cmd) = mpsc::channel(settings.engine.queue_capacity.max(1));
    let cancel_token = CancellationToken::new();

    let worker = tokio::spawn(engine::start_with_cancel_token(
        store.clone(),
        rx_cmd,
        cancel_token.clone(),
    ));

    let state = AppState {
        store,
        sender: tx_cmd,
    };

    let app = build_router(state, &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel_token.cancel();
    worker.await.context("Thread worker panicked")??;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. The worker keeps running until in-flight
/// requests have drained.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let reason = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };
    info!("{} received, draining requests", reason);
}
