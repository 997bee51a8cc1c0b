//! Runtime configuration read from the process environment.

use std::path::PathBuf;

use crate::{error::SyncError, Result};

pub const S3_BUCKET_ENV_VAR: &str = "S3_BUCKET";
pub const AWS_REGION_ENV_VAR: &str = "AWS_REGION";
pub const PLAYERS_PREFIX_ENV_VAR: &str = "PLAYERS_S3_PREFIX";
pub const ROSTER_PREFIX_ENV_VAR: &str = "ROSTER_S3_PREFIX";
pub const ROSTER_TARGETS_KEY_ENV_VAR: &str = "ROSTER_TARGETS_KEY";
pub const PLAYERS_CACHE_PATH_ENV_VAR: &str = "PLAYERS_CACHE_PATH";
pub const PLAYERS_CACHE_TTL_ENV_VAR: &str = "PLAYERS_CACHE_TTL_HR";
pub const USE_S3_PLAYERS_ENV_VAR: &str = "USE_S3_PLAYERS";
pub const BASE_URL_ENV_VAR: &str = "SLEEPER_BASE_URL";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_PLAYERS_PREFIX: &str = "sleeper/players";
pub const DEFAULT_ROSTER_PREFIX: &str = "sleeper/rosters";
pub const DEFAULT_TARGETS_KEY: &str = "sleeper/config/roster_targets.json";
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Settings shared by the CLI and the function handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Publishing is disabled when no bucket is configured.
    pub bucket: Option<String>,
    pub region: String,
    pub players_prefix: String,
    pub roster_prefix: String,
    pub targets_key: String,
    pub players_cache_path: PathBuf,
    pub players_cache_ttl_hours: u64,
    pub use_s3_players: bool,
    pub base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: DEFAULT_REGION.to_string(),
            players_prefix: DEFAULT_PLAYERS_PREFIX.to_string(),
            roster_prefix: DEFAULT_ROSTER_PREFIX.to_string(),
            targets_key: DEFAULT_TARGETS_KEY.to_string(),
            players_cache_path: default_players_cache_path(),
            players_cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            use_s3_players: false,
            base_url: crate::sleeper::http::SLEEPER_BASE_URL.to_string(),
        }
    }
}

impl SyncConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let players_cache_ttl_hours = match get(PLAYERS_CACHE_TTL_ENV_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                SyncError::config(PLAYERS_CACHE_TTL_ENV_VAR, format!("'{raw}': {e}"))
            })?,
            None => defaults.players_cache_ttl_hours,
        };

        Ok(Self {
            bucket: get(S3_BUCKET_ENV_VAR),
            region: get(AWS_REGION_ENV_VAR).unwrap_or(defaults.region),
            players_prefix: get(PLAYERS_PREFIX_ENV_VAR).unwrap_or(defaults.players_prefix),
            roster_prefix: get(ROSTER_PREFIX_ENV_VAR).unwrap_or(defaults.roster_prefix),
            targets_key: get(ROSTER_TARGETS_KEY_ENV_VAR).unwrap_or(defaults.targets_key),
            players_cache_path: get(PLAYERS_CACHE_PATH_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.players_cache_path),
            players_cache_ttl_hours,
            use_s3_players: get(USE_S3_PLAYERS_ENV_VAR).is_some(),
            base_url: get(BASE_URL_ENV_VAR).unwrap_or(defaults.base_url),
        })
    }

    /// Whether roster syncs should prefer the published players map.
    pub fn reads_players_from_bucket(&self) -> bool {
        self.use_s3_players && self.bucket.is_some()
    }
}

/// Path: {cache_dir}/sleeper-sync/players_nfl.json, or the temp dir when the
/// platform has no cache dir (as in a function sandbox without `HOME`).
pub fn default_players_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|base| base.join("sleeper-sync"))
        .unwrap_or_else(std::env::temp_dir)
        .join("players_nfl.json")
}
