use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use braids_booking::booking::Submitter;
use braids_booking::cache::AppCache;
use braids_booking::catalog::Catalog;
use braids_booking::config::Config;
use braids_booking::{app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "braids_booking=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => Catalog::builtin(),
    };
    info!(
        "Catalog loaded: {} services, {} add-ons ({})",
        catalog.services().len(),
        catalog.add_ons().len(),
        catalog.currency()
    );

    let submitter = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .context("connecting to database")?;
            db::run_migrations(&pool).await?;
            Submitter::Postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set; booking requests will only be logged");
            Submitter::Log
        }
    };

    let state = AppState::new(catalog, AppCache::new(&config), submitter);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
