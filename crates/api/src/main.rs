use anyhow::Context;

use coffeeshop_api::app::{build_app, services};
use coffeeshop_api::config::AppConfig;
use coffeeshop_api::context::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coffeeshop_observability::init();

    let config = AppConfig::from_env()?;

    let store = services::build_store(&config)
        .await
        .context("failed to open drink store")?;
    let verifier = services::build_verifier(&config).context("failed to build key set client")?;

    let app = build_app(AppContext::new(store), verifier);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
