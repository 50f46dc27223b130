//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, MemoryAdapter},
    config::{Config, StoreKind},
    error::ApiError,
    web::{api_router, state::AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use summaries_core::ports::SummaryStore;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Summary Store ---
    let store: Arc<dyn SummaryStore> = match config.store {
        StoreKind::Postgres => {
            let database_url = config.database_url.as_ref().ok_or_else(|| {
                ApiError::Internal("DATABASE_URL is required for the postgres store".to_string())
            })?;
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = Arc::new(DbAdapter::new(db_pool));
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            db_adapter
        }
        StoreKind::Memory => {
            info!("Using the in-memory summary store; nothing will be persisted.");
            Arc::new(MemoryAdapter::new())
        }
    };

    // --- 3. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
    });
    let app = api_router(app_state)?;

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
