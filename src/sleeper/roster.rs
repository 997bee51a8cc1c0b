//! League selection and roster enrichment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::SyncError,
    sleeper::{
        players::PlayersCore,
        types::{League, Roster, SleeperUser},
    },
    Result,
};

/// A roster slot expanded with core player data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub player_id: String,
    pub name: Option<String>,
    pub pos: Option<String>,
    pub team: Option<String>,
    pub status: Option<String>,
    pub injury_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Manager {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub team_name: Option<String>,
}

/// One enriched team in a roster snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub league_id: Option<String>,
    pub roster_id: Option<u32>,
    pub manager: Manager,
    pub settings: Value,
    pub players: Vec<PlayerView>,
    pub starters: Vec<PlayerView>,
    pub taxi: Vec<String>,
    pub reserve: Vec<String>,
}

/// How the caller asked for a league.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueSelector<'a> {
    Id(&'a str),
    Name(&'a str),
    Auto,
}

impl<'a> LeagueSelector<'a> {
    /// An explicit id wins over a name.
    pub fn from_options(league_id: Option<&'a str>, league_name: Option<&'a str>) -> Self {
        match (league_id, league_name) {
            (Some(id), _) => Self::Id(id),
            (None, Some(name)) => Self::Name(name),
            (None, None) => Self::Auto,
        }
    }
}

/// Pick the target league out of a user's leagues.
///
/// `Auto` prefers a league that is drafting or in season and falls back to
/// the first one; it yields `None` only for an empty list. `user` is only
/// used in error messages.
pub fn select_league<'l>(
    leagues: &'l [League],
    selector: LeagueSelector<'_>,
    user: &str,
) -> Result<Option<&'l League>> {
    match selector {
        LeagueSelector::Id(id) => leagues
            .iter()
            .find(|l| l.league_id.as_deref() == Some(id))
            .map(Some)
            .ok_or_else(|| SyncError::LeagueNotFound {
                league_id: id.to_string(),
                user: user.to_string(),
            }),
        LeagueSelector::Name(name) => {
            let wanted = name.trim().to_lowercase();
            leagues
                .iter()
                .find(|l| l.name.as_deref().unwrap_or("").trim().to_lowercase() == wanted)
                .map(Some)
                .ok_or_else(|| SyncError::LeagueNameNotFound {
                    league_name: name.to_string(),
                    user: user.to_string(),
                })
        }
        LeagueSelector::Auto => Ok(leagues
            .iter()
            .find(|l| l.is_active())
            .or_else(|| leagues.first())),
    }
}

/// Index league users by `user_id`, skipping users without one.
pub fn index_users(users: Vec<SleeperUser>) -> HashMap<String, SleeperUser> {
    users
        .into_iter()
        .filter_map(|u| u.user_id.clone().map(|id| (id, u)))
        .collect()
}

fn player_view(player_id: &str, players: &PlayersCore) -> PlayerView {
    let core = players.get(player_id);
    PlayerView {
        player_id: player_id.to_string(),
        name: core.and_then(|p| p.full_name.clone()),
        pos: core.and_then(|p| p.position.clone()),
        team: core.and_then(|p| p.team.clone()),
        status: core.and_then(|p| p.status.clone()),
        injury_status: core.and_then(|p| p.injury_status.clone()),
    }
}

fn manager_for(owner_id: Option<&str>, users_by_id: &HashMap<String, SleeperUser>) -> Manager {
    owner_id
        .and_then(|id| users_by_id.get(id))
        .map(|user| Manager {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            team_name: user.team_name(),
        })
        .unwrap_or_default()
}

/// Join rosters with their managers and expand player ids into views.
pub fn enrich_rosters(
    rosters: Vec<Roster>,
    users_by_id: &HashMap<String, SleeperUser>,
    players: &PlayersCore,
) -> Vec<Team> {
    rosters
        .into_iter()
        .map(|roster| {
            let views = |ids: Option<Vec<String>>| -> Vec<PlayerView> {
                ids.unwrap_or_default()
                    .iter()
                    .map(|id| player_view(id, players))
                    .collect()
            };

            Team {
                manager: manager_for(roster.owner_id.as_deref(), users_by_id),
                league_id: roster.league_id,
                roster_id: roster.roster_id,
                settings: roster.settings.unwrap_or_else(|| json!({})),
                players: views(roster.players),
                starters: views(roster.starters),
                taxi: roster.taxi.unwrap_or_default(),
                reserve: roster.reserve.unwrap_or_default(),
            }
        })
        .collect()
}

/// Path-safe form of a username: lowercase, alphanumerics plus `-_.` only.
pub fn safe_username(username: &str) -> String {
    let cleaned: String = username
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
