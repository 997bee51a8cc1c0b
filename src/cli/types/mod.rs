//! Type-safe wrappers for Sleeper identifiers and seasons.

pub mod ids;
pub mod time;

pub use ids::{LeagueId, UserId};
pub use time::Season;
