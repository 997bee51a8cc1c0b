use crate::{
    config::{DEFAULT_PLAYERS_PREFIX, DEFAULT_ROSTER_PREFIX, DEFAULT_TARGETS_KEY},
    error::SyncError,
    LeagueId, Result, Season,
};

pub const DEFAULT_REFRESH_MINUTES: u32 = 30;

/// Context values accepted at deploy time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
    /// The interval roster schedule only exists when this is set.
    pub username: Option<String>,
    pub season: Season,
    pub league_id: Option<LeagueId>,
    pub refresh_minutes: u32,
    pub players_prefix: String,
    pub rosters_prefix: String,
    pub targets_key: String,
}

impl Default for DeployParams {
    fn default() -> Self {
        Self {
            username: None,
            season: Season::default(),
            league_id: None,
            refresh_minutes: DEFAULT_REFRESH_MINUTES,
            players_prefix: DEFAULT_PLAYERS_PREFIX.to_string(),
            rosters_prefix: DEFAULT_ROSTER_PREFIX.to_string(),
            targets_key: DEFAULT_TARGETS_KEY.to_string(),
        }
    }
}

impl DeployParams {
    /// Parse `key=value` pairs on top of the defaults.
    pub fn from_context<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| SyncError::config(pair, "expected key=value"))?;
            params.set(key.trim(), value.trim())?;
        }
        Ok(params)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        let required = |v: &str| {
            optional(v).ok_or_else(|| SyncError::config(key, "must not be empty"))
        };

        match key {
            "username" => self.username = optional(value),
            "season" => {
                self.season = value
                    .parse()
                    .map_err(|e| SyncError::config(key, format!("'{value}': {e}")))?
            }
            "league_id" => self.league_id = optional(value).map(LeagueId::new),
            "refresh_minutes" => {
                let minutes: u32 = value
                    .parse()
                    .map_err(|e| SyncError::config(key, format!("'{value}': {e}")))?;
                if minutes == 0 {
                    return Err(SyncError::config(key, "must be at least 1"));
                }
                self.refresh_minutes = minutes;
            }
            "players_prefix" => self.players_prefix = required(value)?,
            "rosters_prefix" => self.rosters_prefix = required(value)?,
            "targets_key" => self.targets_key = required(value)?,
            _ => return Err(SyncError::config(key, "unknown context key")),
        }
        Ok(())
    }
}
