//! Sleeper Fantasy Football Sync Library
//!
//! Periodically pulls player and roster data from the public Sleeper API and
//! saves JSON snapshots to object storage.
//!
//! ## Features
//!
//! - **Players refresh**: full NFL players map, published dated, as `current`
//!   and as a slim `players_core` map
//! - **Roster snapshots**: one user's league with managers and player details
//!   joined in, written by league and by user
//! - **Scheduled fan-out**: roster snapshots for every target listed in the bucket
//! - **Function handlers**: entry points for the three scheduled functions
//! - **Deployment template**: bucket, functions, roles and schedules as
//!   CloudFormation JSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sleeper_sync::commands::{roster_sync, RosterRequest, SyncContext};
//!
//! # async fn example() -> sleeper_sync::Result<()> {
//! let ctx = SyncContext::from_env().await?;
//! let request = RosterRequest {
//!     username: Some("my_sleeper_name".to_string()),
//!     ..RosterRequest::default()
//! };
//! let snapshot = roster_sync(&ctx, &request).await?;
//! println!("{} teams", snapshot.teams.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set a bucket to publish snapshots; without it only the local cache is written:
//! ```bash
//! export S3_BUCKET=my-fantasy-data
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod deploy;
pub mod error;
pub mod handlers;
pub mod sleeper;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{LeagueId, Season, UserId};
pub use config::SyncConfig;
pub use error::{Result, SyncError};
