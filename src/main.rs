use std::sync::Arc;

use release_radar_api::{
    config::Config, routes::create_router, services::providers::ReleaseFeedProvider,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider = Arc::new(ReleaseFeedProvider::new(
        config.feed_api_key.clone(),
        config.feed_api_url.clone(),
    ));

    let app = create_router(provider);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Release radar API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
