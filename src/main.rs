use hizb_tracker::{
    AppState, Config, ProgressStore, Session, load_mapping, router,
    verses::{AlQuranClient, SurahCache},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let progress_store = ProgressStore::new(&config.data_path);
    let progress = progress_store.load().await;

    let mapping = load_mapping(&config.mapping_path).await;
    match &mapping {
        Ok(mapping) => info!(
            path = %config.mapping_path.display(),
            hizbs = mapping.len(),
            "loaded hizb mapping"
        ),
        Err(err) => error!("failed to load hizb mapping: {err}"),
    }

    let verses = SurahCache::new(Arc::new(AlQuranClient::new(config.api_base.clone())));
    let state = AppState::new(progress_store, Session::new(mapping, progress), verses);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
