//! Roster snapshot for one user's league.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    commands::{
        common::{de_lenient_season, non_empty},
        SyncContext,
    },
    core::{
        cache::read_fresh_players_file,
        PlayersSource,
    },
    error::SyncError,
    sleeper::{
        players::{build_players_core, players_core_from_stored, PlayersCore},
        roster::{enrich_rosters, index_users, safe_username, select_league, LeagueSelector, Team},
        types::{League, SleeperUser},
    },
    storage::{
        get_json,
        keys::{players_core_key, players_current_key, snapshot_timestamp, RosterKeys},
        put_json,
    },
    LeagueId, Result, Season, UserId,
};

/// Which roster to snapshot. Used for CLI input, function events and
/// scheduler targets alike.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RosterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_season")]
    pub season: Option<Season>,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub league_name: Option<String>,
}

impl RosterRequest {
    /// Season to sync; the current year when unspecified.
    pub fn season(&self) -> Season {
        self.season.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotUser {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotLeague {
    pub league_id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub scoring_settings: Option<Value>,
    pub roster_positions: Option<Value>,
}

/// A point-in-time view of every team in a league.
///
/// The `s3_*` fields are only set on the returned value; stored objects carry
/// the snapshot body alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterSnapshot {
    pub fetched_at: String,
    pub user: SnapshotUser,
    pub season: Season,
    pub league: SnapshotLeague,
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_latest_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_user_stable_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_user_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_user_latest_uri: Option<String>,
}

/// Resolve the user and league, enrich the rosters and publish the snapshot.
pub async fn roster_sync(ctx: &SyncContext, request: &RosterRequest) -> Result<RosterSnapshot> {
    roster_sync_at(ctx, request, Utc::now()).await
}

pub async fn roster_sync_at(
    ctx: &SyncContext,
    request: &RosterRequest,
    now: DateTime<Utc>,
) -> Result<RosterSnapshot> {
    let username = non_empty(request.username.as_deref());
    let given_user_id = non_empty(request.user_id.as_deref());
    let season = request.season();

    let lookup = match (username, given_user_id) {
        (None, None) => return Err(SyncError::MissingUserIdentity),
        (None, Some(id)) => id,
        (Some(name), _) => name,
    };

    // The lookup endpoint accepts ids too, so an id passed in the username
    // slot still resolves to the canonical user.
    let user = ctx.client.get_user(lookup).await?.unwrap_or_default();
    let user_id = user
        .user_id
        .clone()
        .or_else(|| given_user_id.map(str::to_string))
        .ok_or_else(|| SyncError::UserNotFound {
            user: username.unwrap_or("unknown").to_string(),
        })?;
    let label = username.unwrap_or(&user_id).to_string();

    let mut leagues = ctx
        .client
        .get_user_leagues(&UserId::new(user_id.clone()), season)
        .await?;
    leagues.retain(|l| l.league_id.is_some());
    let no_leagues = || SyncError::NoLeagues {
        user: label.clone(),
        season: season.as_u16(),
    };
    if leagues.is_empty() {
        return Err(no_leagues());
    }

    let selector = LeagueSelector::from_options(
        non_empty(request.league_id.as_deref()),
        non_empty(request.league_name.as_deref()),
    );
    let target = select_league(&leagues, selector, &label)?
        .ok_or_else(no_leagues)?
        .clone();
    let league_id = LeagueId::new(target.league_id.clone().unwrap_or_default());
    info!(user = %label, %league_id, %season, "syncing rosters");

    let players = load_players_core(ctx).await?;

    let (users, rosters) = tokio::try_join!(
        ctx.client.get_league_users(&league_id),
        ctx.client.get_league_rosters(&league_id),
    )?;
    let teams = enrich_rosters(rosters, &index_users(users), &players);

    let mut snapshot = build_snapshot(&user, season, &target, teams, now);

    if let Some(store) = ctx.store() {
        let stable_name = snapshot
            .user
            .username
            .as_deref()
            .or(username)
            .unwrap_or("unknown");
        let legacy_id = snapshot.user.user_id.clone().unwrap_or(user_id);
        let keys = RosterKeys::new(
            &ctx.config.roster_prefix,
            season,
            &league_id,
            &safe_username(stable_name),
            &legacy_id,
            &snapshot_timestamp(now),
        );

        let body = serde_json::to_value(&snapshot)?;
        snapshot.s3_uri = Some(put_json(store, &keys.league_dated, &body)?);
        snapshot.s3_latest_uri = Some(put_json(store, &keys.league_latest, &body)?);
        snapshot.s3_user_stable_uri = Some(put_json(store, &keys.user_stable, &body)?);
        snapshot.s3_user_uri = Some(put_json(store, &keys.legacy_user_dated, &body)?);
        snapshot.s3_user_latest_uri = Some(put_json(store, &keys.legacy_user_latest, &body)?);
    }

    Ok(snapshot)
}

fn build_snapshot(
    user: &SleeperUser,
    season: Season,
    league: &League,
    teams: Vec<Team>,
    now: DateTime<Utc>,
) -> RosterSnapshot {
    RosterSnapshot {
        fetched_at: now.to_rfc3339(),
        user: SnapshotUser {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        },
        season,
        league: SnapshotLeague {
            league_id: league.league_id.clone(),
            name: league.name.clone(),
            status: league.status.clone(),
            scoring_settings: league.scoring_settings.clone(),
            roster_positions: league.roster_positions.clone(),
        },
        teams,
        s3_uri: None,
        s3_latest_uri: None,
        s3_user_stable_uri: None,
        s3_user_uri: None,
        s3_user_latest_uri: None,
    }
}

/// Players core for enrichment: the published map when enabled, then a fresh
/// local file, then the API.
pub async fn load_players_core(ctx: &SyncContext) -> Result<Arc<PlayersCore>> {
    let cache = &ctx.players_cache;

    // Never memory-cached: the daily refresh replaces these objects.
    if ctx.config.reads_players_from_bucket() {
        if let Some(store) = ctx.store() {
            let prefix = &ctx.config.players_prefix;
            let stored = get_json::<Value>(store, &players_core_key(prefix))
                .filter(|v| v.as_object().is_some_and(|m| !m.is_empty()))
                .or_else(|| get_json::<Value>(store, &players_current_key(prefix)));
            if let Some(core) = stored.and_then(players_core_from_stored) {
                info!(count = core.len(), "players core from bucket");
                return Ok(Arc::new(core));
            }
        }
    }

    let path = &ctx.config.players_cache_path;
    let file_source = PlayersSource::LocalFile(path.clone());
    if let Some(core) = cache.get(&file_source) {
        debug!("players core from memory (local file)");
        return Ok(core);
    }
    if let Some(full) = read_fresh_players_file(path, ctx.config.players_cache_ttl_hours) {
        info!(path = %path.display(), "players core from local cache");
        return cache.put(file_source, build_players_core(&full));
    }

    let api_source = PlayersSource::Api(ctx.client.base_url().to_string());
    if let Some(core) = cache.get(&api_source) {
        return Ok(core);
    }
    let full = ctx.client.fetch_players().await?;
    info!(count = full.len(), "players core from API");
    cache.put(api_source, build_players_core(&full))
}
