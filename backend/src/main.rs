use anyhow::Context;
use clap::Parser;
use convert_server::{build_app, telemetry, AppState, Config};
use tokio::net::TcpListener;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Gagal memasang handler Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init()?;

    tracing::debug!("{:?}", config);

    let addr = config.bind_address();
    let app = build_app(AppState::from_config(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Gagal bind ke {addr}"))?;

    tracing::info!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
