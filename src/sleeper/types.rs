//! Wire types for the subset of the Sleeper API the sync reads.
//!
//! Every field is optional: the API omits or nulls fields freely, and a
//! snapshot should still be written for partially populated leagues.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full `/players/nfl` payload keyed by player id, in API order.
pub type PlayersMap = Map<String, Value>;

/// A user as returned by `/user/{x}` and `/league/{id}/users`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SleeperUser {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl SleeperUser {
    /// Team name managers set per league, if any.
    pub fn team_name(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("team_name"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// A league from `/user/{id}/leagues/nfl/{season}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct League {
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scoring_settings: Option<Value>,
    #[serde(default)]
    pub roster_positions: Option<Value>,
}

impl League {
    /// Leagues that are drafting or in season are preferred when no league
    /// is requested explicitly.
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_deref(), Some("drafting") | Some("in_season"))
    }
}

/// A roster from `/league/{id}/rosters`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Roster {
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub roster_id: Option<u32>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
    #[serde(default)]
    pub taxi: Option<Vec<String>>,
    #[serde(default)]
    pub reserve: Option<Vec<String>>,
    #[serde(default)]
    pub settings: Option<Value>,
}

/// Slim per-player record published as `players_core.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PlayerCore {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub bye_week: Option<Value>,
    pub status: Option<String>,
    pub injury_status: Option<String>,
}
