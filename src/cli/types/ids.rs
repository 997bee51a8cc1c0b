//! ID types for the Sleeper API.
//!
//! Sleeper hands out ids as decimal strings that can exceed `u64`, so they are
//! kept as strings and only checked for emptiness.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for Sleeper league ids.
///
/// # Examples
///
/// ```rust
/// use sleeper_sync::LeagueId;
///
/// let league_id: LeagueId = "1048245617823916032".parse().unwrap();
/// assert_eq!(league_id.as_str(), "1048245617823916032");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeagueId(pub String);

impl LeagueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LeagueId {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        non_empty("league_id", s).map(Self)
    }
}

/// Type-safe wrapper for Sleeper user ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        non_empty("user_id", s).map(Self)
    }
}

fn non_empty(key: &str, s: &str) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SyncError::config(key, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
