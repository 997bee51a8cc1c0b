//! Slim "core" view of the players map.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::sleeper::types::{PlayerCore, PlayersMap};

/// Player id -> core record.
pub type PlayersCore = BTreeMap<String, PlayerCore>;

fn non_empty_str<'a>(player: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    player
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Best display name: `full_name`, then "first last", then the search and
/// display names.
pub fn resolve_full_name(player: &Map<String, Value>) -> Option<String> {
    if let Some(name) = non_empty_str(player, "full_name") {
        return Some(name.to_string());
    }

    let joined = [
        non_empty_str(player, "first_name"),
        non_empty_str(player, "last_name"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    if !joined.is_empty() {
        return Some(joined);
    }

    non_empty_str(player, "search_full_name")
        .or_else(|| non_empty_str(player, "display_name"))
        .map(str::to_string)
}

fn core_from_value(value: &Value) -> PlayerCore {
    let empty = Map::new();
    let player = value.as_object().unwrap_or(&empty);
    let text = |key: &str| player.get(key).and_then(Value::as_str).map(str::to_string);

    PlayerCore {
        full_name: resolve_full_name(player),
        position: text("position"),
        team: text("team"),
        bye_week: player.get("bye_week").filter(|v| !v.is_null()).cloned(),
        status: text("status"),
        injury_status: text("injury_status"),
    }
}

/// Reduce the full players map to the fields roster enrichment needs.
pub fn build_players_core(full: &PlayersMap) -> PlayersCore {
    let entries: Vec<(&String, &Value)> = full.iter().collect();
    entries
        .into_par_iter()
        .map(|(id, value)| (id.clone(), core_from_value(value)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Normalize a map read back from storage, which may be either the published
/// core map or a full players map. The first entry decides which.
pub fn players_core_from_stored(value: Value) -> Option<PlayersCore> {
    let Value::Object(map) = value else {
        return None;
    };

    let core_shaped = map
        .values()
        .next()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("full_name"));

    if core_shaped {
        if let Ok(core) = serde_json::from_value::<PlayersCore>(Value::Object(map.clone())) {
            return Some(core);
        }
    }
    Some(build_players_core(&map))
}
