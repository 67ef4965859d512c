use anyhow::Context;
use rusty_library_ledger::{
    adapters::{memory::InMemoryDocumentStore, postgres::PostgresDocumentStore},
    api::{handlers::AppState, router::create_router},
    application::checkout::ServiceDependencies,
    config::{AppConfig, StoreBackend, StoreConfig},
    ports::DocumentStore,
    telemetry,
};
use std::sync::Arc;

/// 設定に応じたドキュメントストアを構築する
async fn build_document_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .url
                .as_deref()
                .context("store.url (or DATABASE_URL) is required for the postgres backend")?;

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            let store = PostgresDocumentStore::new(pool);
            store
                .migrate()
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations completed");

            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    tracing::info!("Starting checkout ledger v{}", env!("CARGO_PKG_VERSION"));

    // Initialize adapters
    let document_store = build_document_store(&config.store).await?;

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps: ServiceDependencies::new(document_store),
    });

    // Create router
    let app = create_router(app_state);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
