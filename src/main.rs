use std::sync::Arc;

use cinematch_api::{
    config::Config,
    db,
    routes::{create_router, AppState, Limits},
    services::catalog::{CatalogStore, PgCatalogStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinematch_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool));
    let titles = catalog.count().await?;
    if titles == 0 {
        tracing::warn!("Catalog is empty, import titles via POST /api/v1/titles");
    }

    let state = AppState::new(catalog, Limits::from(&config));

    // Build the index up front so the first request does not pay for it.
    match state.engine.refresh().await {
        Ok(status) => tracing::info!(
            titles = status.titles,
            ready = status.ready,
            "Recommendation engine initialized"
        ),
        Err(e) => tracing::error!(error = %e, "Initial index build failed, will retry on demand"),
    }

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
