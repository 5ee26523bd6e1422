use anyhow::Context;
use content_store::ContentRoot;
use fsd_server::{AppState, ServerConfig, build_router};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting fsd server");
    let config = ServerConfig::load().context("failed to load server config")?;

    let root = ContentRoot::open(&config.content_root).with_context(|| {
        format!(
            "content root is not a usable directory: {}",
            config.content_root.display()
        )
    })?;
    info!(root = %root.base().display(), "serving content root");

    let app = build_router(AppState::new(root));
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, stopping server"),
        Err(err) => {
            warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
