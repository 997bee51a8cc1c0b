//! Core utilities shared by the sync operations
//!
//! - `cache`: players cache (memory LRU + local file)

pub mod cache;

pub use cache::{PlayersCache, PlayersSource};
