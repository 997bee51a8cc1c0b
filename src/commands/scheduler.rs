//! Fan-out over the roster targets list stored in the bucket.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    commands::{roster_sync::roster_sync, RosterRequest, SyncContext},
    storage::get_json,
    Season,
};

pub const TARGETS_HINT: &str =
    "Upload a JSON array of {username|user_id, league_id|league_name, season?}";

/// Outcome for a single target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TargetResult {
    Synced {
        ok: bool,
        season: Season,
        league_id: Option<String>,
        s3_latest_uri: Option<String>,
    },
    Failed {
        ok: bool,
        error: String,
        target: Value,
    },
}

impl TargetResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, TargetResult::Synced { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerReport {
    pub count: usize,
    pub errors: usize,
    pub results: Vec<TargetResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissingTargets {
    pub error: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerOutcome {
    /// No readable JSON array at the targets key.
    MissingTargets(MissingTargets),
    Completed(SchedulerReport),
}

/// Sync every configured target in order. Failures are recorded per target
/// and never abort the run.
pub async fn run_scheduler(ctx: &SyncContext) -> SchedulerOutcome {
    let key = &ctx.config.targets_key;
    let targets = ctx.store().and_then(|store| get_json::<Value>(store, key));

    let Some(Value::Array(targets)) = targets else {
        let error = format!("No valid targets list at s3://{}/{}", ctx.bucket_label(), key);
        warn!("{error}");
        return SchedulerOutcome::MissingTargets(MissingTargets {
            error,
            hint: TARGETS_HINT.to_string(),
        });
    };

    let mut results = Vec::with_capacity(targets.len());
    for target in &targets {
        let result = sync_target(ctx, target).await;
        if !result.is_ok() {
            warn!(?target, "roster target failed");
        }
        results.push(result);
    }

    let errors = results.iter().filter(|r| !r.is_ok()).count();
    info!(count = targets.len(), errors, "scheduler run finished");

    SchedulerOutcome::Completed(SchedulerReport {
        count: targets.len(),
        errors,
        results,
    })
}

async fn sync_target(ctx: &SyncContext, target: &Value) -> TargetResult {
    let failed = |error: String| TargetResult::Failed {
        ok: false,
        error,
        target: target.clone(),
    };

    let request: RosterRequest = match serde_json::from_value(target.clone()) {
        Ok(request) => request,
        Err(e) => return failed(format!("invalid target: {e}")),
    };

    match roster_sync(ctx, &request).await {
        Ok(snapshot) => TargetResult::Synced {
            ok: true,
            season: snapshot.season,
            league_id: snapshot.league.league_id.or(request.league_id),
            s3_latest_uri: snapshot.s3_latest_uri,
        },
        Err(e) => failed(e.to_string()),
    }
}
