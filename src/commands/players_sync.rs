//! Daily players refresh.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    commands::SyncContext,
    core::{cache::write_players_file, PlayersSource},
    sleeper::players::build_players_core,
    storage::{
        keys::{players_core_key, players_current_key, players_day_key},
        put_json,
    },
    Result,
};

pub const PUBLISH_DISABLED_WARNING: &str =
    "S3_BUCKET not set or publish disabled; wrote local cache only";

/// Summary returned by a players refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayersSyncReport {
    pub fetched_at: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_core: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_out: Option<PathBuf>,
}

/// Fetch the full players map, refresh the local cache and publish the dated,
/// current and core objects.
pub async fn players_sync(ctx: &SyncContext, out_local: Option<&Path>) -> Result<PlayersSyncReport> {
    players_sync_at(ctx, out_local, Utc::now()).await
}

pub async fn players_sync_at(
    ctx: &SyncContext,
    out_local: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<PlayersSyncReport> {
    let full = ctx.client.fetch_players().await?;
    info!(count = full.len(), "fetched players map");

    let cache_path = &ctx.config.players_cache_path;
    write_players_file(cache_path, &full)?;

    let core = build_players_core(&full);

    let mut report = PlayersSyncReport {
        fetched_at: now.to_rfc3339(),
        count: full.len(),
        s3_day: None,
        s3_current: None,
        s3_core: None,
        warning: None,
        local_out: None,
    };

    match ctx.store() {
        Some(store) => {
            let prefix = &ctx.config.players_prefix;
            report.s3_day = Some(put_json(store, &players_day_key(prefix, now.date_naive()), &full)?);
            report.s3_current = Some(put_json(store, &players_current_key(prefix), &full)?);
            report.s3_core = Some(put_json(store, &players_core_key(prefix), &core)?);
        }
        None => {
            warn!("{PUBLISH_DISABLED_WARNING}");
            report.warning = Some(PUBLISH_DISABLED_WARNING.to_string());
        }
    }

    // The local file was just rewritten, so a roster sync in this process can
    // skip straight to the built core.
    ctx.players_cache
        .put(PlayersSource::LocalFile(cache_path.clone()), core)?;

    if let Some(out) = out_local {
        write_players_file(out, &full)?;
        report.local_out = Some(out.to_path_buf());
    }

    Ok(report)
}
