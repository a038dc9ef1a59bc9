//! Startup wiring: choose the drink store and build the token verifier.

use std::sync::Arc;
use std::time::Duration;

use coffeeshop_auth::{JwtVerifier, RemoteKeySet};
use coffeeshop_infra::{DrinkStore, InMemoryDrinkStore, SqliteDrinkStore, StoreError};

use crate::config::AppConfig;

/// Store selected by `DATABASE_URL`: unset keeps drinks in memory, `sqlite:` opens a file.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn DrinkStore>, StoreError> {
    let store: Arc<dyn DrinkStore> = match config.database_url.as_deref() {
        None => {
            tracing::warn!("DATABASE_URL not set; drinks are kept in memory and lost on restart");
            Arc::new(InMemoryDrinkStore::new())
        }
        Some(url) if url.starts_with("sqlite:") => {
            tracing::info!(%url, "opening sqlite drink store");
            Arc::new(SqliteDrinkStore::connect(url).await?)
        }
        Some(url) => {
            return Err(StoreError::Unavailable(format!(
                "unsupported DATABASE_URL '{url}': only sqlite: is available"
            )));
        }
    };

    if config.reset_database {
        store.reset().await?;
    }
    Ok(store)
}

/// Upper bound on one key set fetch; a stalled issuer fails the request with 401.
pub const KEY_SET_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Verifier trusting the Auth0 tenant's published key set.
pub fn build_verifier(config: &AppConfig) -> Result<Arc<JwtVerifier>, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(KEY_SET_FETCH_TIMEOUT)
        .build()?;

    let verifier_config = config.verifier_config();
    let keys = RemoteKeySet::for_issuer(&verifier_config.issuer).with_http_client(client);
    tracing::info!(url = keys.url(), "verifying tokens against remote key set");
    Ok(Arc::new(JwtVerifier::new(verifier_config, Arc::new(keys))))
}
