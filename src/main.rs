use scout_logger::{load_config, load_store, resolve_config_path, resolve_data_path, router, AppState};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = load_config(resolve_config_path().as_deref())?;
    let (min_weight, max_weight) = config.weight_bounds();
    info!(
        categories = config.categories.len(),
        outcomes = config.outcomes.len(),
        min_weight,
        max_weight,
        "scouting grid ready"
    );

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let store = load_store(&data_path).await;
    let state = AppState::new(data_path, config, store);
    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
