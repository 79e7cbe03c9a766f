use clap::Parser;
use hit_counter::config::Config;
use hit_counter::hits::handlers::router;
use hit_counter::hits::service::HitStore;
use hit_counter::storage::memory::MemoryDatabase;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting hit counter on {}", config.bind);

    // 1. Store handle, shared by every request:
    let database = MemoryDatabase::new(&config.database_id);
    let store = Arc::new(HitStore::from_database(
        &database,
        &config.hit_table,
        &config.site_table,
    ));

    // 2. Seed configured sites:
    let shutdown = CancellationToken::new();
    for site_id in &config.sites {
        store.register_site(site_id, &shutdown).await?;
    }
    if config.sites.is_empty() {
        tracing::warn!("No sites registered, every hit will be rejected");
    }

    // 3. HTTP Router:
    let app = router(store, shutdown.clone());

    // 4. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
