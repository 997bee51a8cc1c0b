//! Error types for the Sleeper sync functions

use thiserror::Error;


pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("roster_sync requires 'user_id' or 'username'")]
    MissingUserIdentity,

    #[error("No user_id for user '{user}'")]
    UserNotFound { user: String },

    #[error("No leagues for user {user} in {season}")]
    NoLeagues { user: String, season: u16 },

    #[error("league_id {league_id} not found for user {user}")]
    LeagueNotFound { league_id: String, user: String },

    #[error("league_name '{league_name}' not found for user {user}")]
    LeagueNameNotFound { league_name: String, user: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    #[error("Invalid event payload: {message}")]
    InvalidEvent { message: String },
}

impl SyncError {
    pub(crate) fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    pub(crate) fn storage(message: impl Into<String>) -> Self {
        SyncError::Storage {
            message: message.into(),
        }
    }
}
