use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use chat_relay::{
    config::Config, routes, services::completion::OpenAiClient, state::AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chat_relay=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    let completions = OpenAiClient::from_config(&config)?;
    let addr = config.bind_addr();

    info!(model = %config.model, public_dir = %config.public_dir.display(), "configuration loaded");

    let state = Arc::new(AppState::new(config, Arc::new(completions)));

    // Idle clients would otherwise keep their window forever.
    let limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(limiter.window());
        loop {
            ticker.tick().await;
            let removed = limiter.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "purged expired rate limit windows");
            }
        }
    });

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("chat relay running on http://localhost:{}", addr.port());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
