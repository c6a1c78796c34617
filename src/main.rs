use std::sync::Arc;

use smart_recipe_api::{
    config::Config,
    routes::{create_router, AppState},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("smart_recipe_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        storage = ?config.storage_backend,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
