//! Wedding Marketplace admin server binary

use std::{sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wm_backend::{
    config::{Config, StoreBackend},
    create_app,
    error::AppError,
    store::{MarketplaceStore, MemoryStore, PgStore, RestStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wm_server=debug,wm_backend=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Wedding Marketplace Admin Server");
    tracing::info!("Environment: {}", config.environment);

    let store = connect_store(&config).await?;

    let addr = config.server.socket_addr().map_err(|e| {
        AppError::Configuration(format!("invalid server.host {:?}: {}", config.server.host, e))
    })?;
    let state = AppState::new(store, config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the configured store backend
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn MarketplaceStore>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&config.database.url)
                .await?;
            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Ok(Arc::new(PgStore::new(db_pool)))
        }
        StoreBackend::Rest => {
            if config.store.rest_url.is_empty() {
                return Err(AppError::Configuration(
                    "store.rest_url is required for the rest backend".to_string(),
                )
                .into());
            }
            tracing::info!("Using REST gateway at {}", config.store.rest_url);
            Ok(Arc::new(RestStore::new(
                &config.store.rest_url,
                &config.store.rest_api_key,
            )))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
