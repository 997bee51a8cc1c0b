//! Shared context for the sync operations.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    config::SyncConfig,
    core::PlayersCache,
    sleeper::http::SleeperClient,
    storage::{ObjectStore, S3ObjectStore},
    Result, Season,
};

/// Resources every sync operation needs. Build it once per process so the
/// players cache survives across warm invocations.
pub struct SyncContext {
    pub config: SyncConfig,
    pub client: SleeperClient,
    pub players_cache: PlayersCache,
    store: Option<Arc<dyn ObjectStore>>,
}

impl SyncContext {
    pub fn new(
        config: SyncConfig,
        client: SleeperClient,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Self {
        let players_cache = PlayersCache::with_ttl_hours(config.players_cache_ttl_hours);
        Self {
            config,
            client,
            players_cache,
            store,
        }
    }

    /// Read [`SyncConfig`] from the environment and connect to the bucket if
    /// one is configured.
    pub async fn from_env() -> Result<Self> {
        let config = SyncConfig::from_env()?;
        let client = SleeperClient::with_base_url(config.base_url.clone())?;

        let store: Option<Arc<dyn ObjectStore>> = match &config.bucket {
            Some(bucket) => Some(Arc::new(
                S3ObjectStore::connect(bucket.clone(), &config.region).await,
            )),
            None => None,
        };

        Ok(Self::new(config, client, store))
    }

    /// The configured bucket, if publishing is enabled.
    pub fn store(&self) -> Option<&dyn ObjectStore> {
        self.store.as_deref()
    }

    /// Bucket name for messages; `None` when publishing is disabled.
    pub fn bucket_label(&self) -> &str {
        self.store()
            .map(|s| s.bucket())
            .or(self.config.bucket.as_deref())
            .unwrap_or("None")
    }
}

/// Treat empty or whitespace-only strings as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Accept a season as a number, a numeric string, or null. Zero and empty
/// strings count as unset.
pub(crate) fn de_lenient_season<'de, D>(deserializer: D) -> std::result::Result<Option<Season>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let season = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u16::try_from(v).ok())
            .map(Season::new)
            .ok_or_else(|| D::Error::custom(format!("invalid season: {n}")))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s
            .parse::<Season>()
            .map_err(|e| D::Error::custom(format!("invalid season '{s}': {e}")))?,
        Some(other) => return Err(D::Error::custom(format!("invalid season: {other}"))),
    };

    Ok((season.as_u16() != 0).then_some(season))
}
