//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use types::{LeagueId, Season, UserId};

use crate::commands::RosterRequest;

#[derive(Debug, Parser)]
#[clap(name = "sleeper-sync", about = "Sleeper players and roster snapshots")]
pub struct SleeperSync {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the full players map and publish it to the bucket (and local cache).
    PlayersSync {
        /// Also write the full players map to this file.
        #[clap(long)]
        out: Option<PathBuf>,
    },

    /// Snapshot a league's rosters for one user.
    ///
    /// Either `--username` or `--user-id` is required. Without `--league-id`
    /// or `--league-name` a drafting/in-season league is picked.
    RosterSync {
        /// Sleeper username (alternative to --user-id).
        #[clap(long)]
        username: Option<String>,

        /// Sleeper user_id (alternative to --username).
        #[clap(long)]
        user_id: Option<UserId>,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Target league_id (preferred if known).
        #[clap(long)]
        league_id: Option<LeagueId>,

        /// Target league name (if id unknown).
        #[clap(long)]
        league_name: Option<String>,

        /// Write the roster snapshot to this file.
        #[clap(long)]
        out: Option<PathBuf>,
    },

    /// Run the roster fan-out over the targets list in the bucket.
    Scheduler,

    /// Print the deployment template (CloudFormation JSON).
    Template {
        /// Deploy-time context value, repeatable: `-c username=me -c refresh_minutes=15`.
        #[clap(long = "context", short = 'c')]
        context: Vec<String>,

        /// Write the template to this file instead of stdout.
        #[clap(long)]
        out: Option<PathBuf>,
    },
}

/// Build the request a `roster-sync` invocation describes.
pub fn roster_request(
    username: Option<String>,
    user_id: Option<UserId>,
    season: Season,
    league_id: Option<LeagueId>,
    league_name: Option<String>,
) -> RosterRequest {
    RosterRequest {
        username,
        user_id: user_id.map(|id| id.0),
        season: Some(season),
        league_id: league_id.map(|id| id.0),
        league_name,
    }
}
