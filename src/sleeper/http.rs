//! HTTP client for the public Sleeper v1 API.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    sleeper::types::{League, PlayersMap, Roster, SleeperUser},
    LeagueId, Result, Season, UserId,
};


/// Base path for the Sleeper v1 API.
pub const SLEEPER_BASE_URL: &str = "https://api.sleeper.app/v1";

pub const USER_AGENT: &str = "sleeper-sync/0.2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Thin wrapper that pins the base URL so tests can point it at a mock server.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: Client,
    base_url: String,
}

impl SleeperClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SLEEPER_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(value)
    }

    /// Look up a user by username or id. Sleeper answers unknown users with a
    /// `null` body, which maps to `None`.
    pub async fn get_user(&self, username_or_id: &str) -> Result<Option<SleeperUser>> {
        self.fetch_json(&format!("/user/{username_or_id}")).await
    }

    pub async fn get_user_leagues(&self, user_id: &UserId, season: Season) -> Result<Vec<League>> {
        let leagues: Option<Vec<League>> = self
            .fetch_json(&format!("/user/{user_id}/leagues/nfl/{season}"))
            .await?;
        Ok(leagues.unwrap_or_default())
    }

    pub async fn get_league_users(&self, league_id: &LeagueId) -> Result<Vec<SleeperUser>> {
        let users: Option<Vec<SleeperUser>> =
            self.fetch_json(&format!("/league/{league_id}/users")).await?;
        Ok(users.unwrap_or_default())
    }

    pub async fn get_league_rosters(&self, league_id: &LeagueId) -> Result<Vec<Roster>> {
        let rosters: Option<Vec<Roster>> = self
            .fetch_json(&format!("/league/{league_id}/rosters"))
            .await?;
        Ok(rosters.unwrap_or_default())
    }

    /// Full NFL players map (several megabytes; callers should cache it).
    pub async fn fetch_players(&self) -> Result<PlayersMap> {
        self.fetch_json("/players/nfl").await
    }
}
