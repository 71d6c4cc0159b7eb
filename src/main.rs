//! etiqueta-pricing - JSON pricing service for label quotes.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use etiqueta_pricing::cache::{start_snapshot_warmer, AppCache};
use etiqueta_pricing::config::AppConfig;
use etiqueta_pricing::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    // Entries outlive two refresh periods
    let cache = AppCache::new(config.snapshot_refresh * 2);
    tokio::spawn(start_snapshot_warmer(
        cache.clone(),
        db.clone(),
        config.snapshot_refresh,
    ));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app(AppState { db, cache }))
        .await
        .context("Server error")?;

    Ok(())
}
