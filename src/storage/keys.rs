//! Object key layout.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{LeagueId, Season};

/// Snapshot timestamp used in dated roster keys, e.g. `20240915T173000Z`.
pub fn snapshot_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `{prefix}/{YYYY-MM-DD}.json`
pub fn players_day_key(prefix: &str, day: NaiveDate) -> String {
    format!("{prefix}/{}.json", day.format("%Y-%m-%d"))
}

/// `{prefix}/current.json`
pub fn players_current_key(prefix: &str) -> String {
    format!("{prefix}/current.json")
}

/// `{prefix}/players_core.json`
pub fn players_core_key(prefix: &str) -> String {
    format!("{prefix}/players_core.json")
}

/// Every key one roster sync writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterKeys {
    pub league_dated: String,
    pub league_latest: String,
    pub user_stable: String,
    pub legacy_user_dated: String,
    pub legacy_user_latest: String,
}

impl RosterKeys {
    /// `safe_username` must already be sanitized; `legacy_user_id` feeds the
    /// older `by_user/{user_id}` layout still read by existing consumers.
    pub fn new(
        base: &str,
        season: Season,
        league_id: &LeagueId,
        safe_username: &str,
        legacy_user_id: &str,
        timestamp: &str,
    ) -> Self {
        let league_base = format!("{base}/{season}/{league_id}");
        let user_base = format!("{base}/by_user/{safe_username}/{season}/{league_id}");
        let legacy_base = format!("{base}/by_user/{legacy_user_id}/{season}/{league_id}");

        Self {
            league_dated: format!("{league_base}/{timestamp}.json"),
            league_latest: format!("{league_base}/latest.json"),
            user_stable: format!("{user_base}/roster.json"),
            legacy_user_dated: format!("{legacy_base}/{timestamp}.json"),
            legacy_user_latest: format!("{legacy_base}/latest.json"),
        }
    }
}
