use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use website::config::AppConfig;
use website::database::activity_directory::ActivityDirectory;
use website::database::catalog;
use website::web;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(build_id = env!("ACTIVITIES_BUILD_ID"), ?config, "starting");

    // 2. Seed the directory
    let catalog = match &config.catalog_path {
        Some(path) => catalog::load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => catalog::default_catalog(),
    };
    let directory = Arc::new(ActivityDirectory::new(catalog));
    info!(activities = directory.len(), "activity directory ready");

    // 3. Build the application
    let app = web::build_router(directory, &config.static_dir);

    // 4. Start the server (with fallback port)
    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = config
                .fallback_addr()
                .with_context(|| format!("cannot bind {}: {}", addr, e))?;
            warn!(%addr, error = %e, %fallback, "bind failed, trying fallback");
            tokio::net::TcpListener::bind(&fallback)
                .await
                .with_context(|| format!("cannot bind fallback {}", fallback))?
        }
    };

    let bound_addr = listener.local_addr()?;
    info!("Server running on http://{}", bound_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
