use anyhow::Context;
use bananascape::config::AppConfig;
use bananascape::observability::{init_tracing, LogFormat};
use bananascape_server::{router, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local development keeps the API key in `.env`
    dotenv::dotenv().ok();
    init_tracing(LogFormat::from_env(), "info");

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    tokio::fs::create_dir_all(&config.assets_dir)
        .await
        .with_context(|| format!("creating {}", config.assets_dir.display()))?;

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!(
        %address,
        assets_dir = %config.assets_dir.display(),
        "bananascape server listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
