//! Issuer key sets.
//!
//! The issuer publishes its public signing keys as a JWK set (key id -> key).
//! [`CachedKeySet`] fetches it once per process and serves every later lookup
//! from memory.
//!
//! Known limitation: there is no refresh. Keys the issuer rotates in after the
//! first successful fetch are unknown until the process restarts, and tokens
//! signed with them fail with [`AuthError::KeyNotFound`].

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::OnceCell;

use crate::AuthError;

/// Where a key set comes from.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Key set published over HTTPS by the issuer.
#[derive(Debug, Clone)]
pub struct RemoteKeySet {
    url: String,
    client: reqwest::Client,
}

impl RemoteKeySet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The conventional `/.well-known/jwks.json` location under `issuer`.
    pub fn for_issuer(issuer: &str) -> Self {
        Self::new(format!(
            "{}/.well-known/jwks.json",
            issuer.trim_end_matches('/')
        ))
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySetSource for RemoteKeySet {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let unavailable = |e: reqwest::Error| {
            tracing::warn!(url = %self.url, error = %e, "failed to fetch issuer key set");
            AuthError::KeySetUnavailable(e.to_string())
        };

        let keys = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json::<JwkSet>()
            .await
            .map_err(unavailable)?;

        tracing::info!(url = %self.url, keys = keys.keys.len(), "fetched issuer key set");
        Ok(keys)
    }
}

/// Fixed key set (local keys, tests).
#[derive(Debug, Clone)]
pub struct StaticKeySet(JwkSet);

impl StaticKeySet {
    pub fn new(keys: JwkSet) -> Self {
        Self(keys)
    }
}

#[async_trait]
impl KeySetSource for StaticKeySet {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        Ok(self.0.clone())
    }
}

/// Process-lifetime cache in front of a [`KeySetSource`].
///
/// The first successful fetch is kept forever. A failed fetch is not cached,
/// so the next request tries again.
pub struct CachedKeySet {
    source: Arc<dyn KeySetSource>,
    keys: OnceCell<Arc<JwkSet>>,
}

impl CachedKeySet {
    pub fn new(source: Arc<dyn KeySetSource>) -> Self {
        Self {
            source,
            keys: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.keys
            .get_or_try_init(|| async { self.source.fetch().await.map(Arc::new) })
            .await
            .cloned()
    }
}

impl core::fmt::Debug for CachedKeySet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedKeySet")
            .field("loaded", &self.keys.initialized())
            .finish()
    }
}
