//! Sleeper API access and the transformations applied to its payloads.

pub mod http;
pub mod players;
pub mod roster;
pub mod types;
