//! Two-tier cache for the players core
//!
//! - L1: in-memory LRU keyed by where the map came from, so warm function
//!   invocations and scheduler fan-out reuse an already-built core. The
//!   published bucket map is never held here: it is re-read on every sync so
//!   the daily refresh reaches warm functions.
//! - L2: the full players map on local disk, trusted while its mtime is
//!   within the configured TTL

use lru::LruCache;
use std::{
    fs,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant, SystemTime},
};

use crate::{
    error::SyncError,
    sleeper::{players::PlayersCore, types::PlayersMap},
    Result,
};

/// Where a cached players core was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayersSource {
    LocalFile(PathBuf),
    Api(String),
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// Whether the file at `path` was modified within the last `ttl_hours`.
/// Missing files are never fresh.
pub fn is_fresh(path: &Path, ttl_hours: u64) -> bool {
    let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    age.as_secs_f64() / 3600.0 <= ttl_hours as f64
}

/// Write the full players map to the local cache file.
pub fn write_players_file(path: &Path, players: &PlayersMap) -> Result<()> {
    let contents = serde_json::to_string(players)?;
    write_string(path, &contents)?;
    Ok(())
}

/// Read the local players file if it is fresh. Unreadable or malformed files
/// count as a miss.
pub fn read_fresh_players_file(path: &Path, ttl_hours: u64) -> Option<PlayersMap> {
    if !is_fresh(path, ttl_hours) {
        return None;
    }
    let contents = try_read_to_string(path)?;
    serde_json::from_str(&contents).ok()
}

/// In-memory LRU of built cores with per-entry expiry.
pub struct PlayersCache {
    memory_cache: Mutex<LruCache<PlayersSource, (Instant, Arc<PlayersCore>)>>,
    memory_capacity: usize,
    ttl: Duration,
}

impl PlayersCache {
    pub fn new(memory_capacity: usize, ttl: Duration) -> Self {
        Self {
            memory_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(memory_capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            memory_capacity,
            ttl,
        }
    }

    /// Cache sized for the two cacheable sources, expiring after `ttl_hours`.
    pub fn with_ttl_hours(ttl_hours: u64) -> Self {
        Self::new(2, Duration::from_secs(ttl_hours.saturating_mul(3600)))
    }

    pub fn get(&self, source: &PlayersSource) -> Option<Arc<PlayersCore>> {
        let mut cache = self.memory_cache.lock().ok()?;
        match cache.get(source) {
            Some((stored_at, core)) if stored_at.elapsed() <= self.ttl => Some(Arc::clone(core)),
            Some(_) => {
                cache.pop(source);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, source: PlayersSource, core: PlayersCore) -> Result<Arc<PlayersCore>> {
        let core = Arc::new(core);
        self.memory_cache
            .lock()
            .map_err(|_| SyncError::Cache {
                message: "players cache lock poisoned".to_string(),
            })?
            .put(source, (Instant::now(), Arc::clone(&core)));
        Ok(core)
    }

    pub fn clear_memory(&self) {
        if let Ok(mut cache) = self.memory_cache.lock() {
            cache.clear();
        }
    }

    /// (entries, capacity)
    pub fn memory_stats(&self) -> (usize, usize) {
        let used = self.memory_cache.lock().map(|c| c.len()).unwrap_or(0);
        (used, self.memory_capacity)
    }
}
