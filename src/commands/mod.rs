//! Sync operations behind the CLI and the function handlers

pub mod common;
pub mod players_sync;
pub mod roster_sync;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use common::SyncContext;
pub use players_sync::{players_sync, PlayersSyncReport};
pub use roster_sync::{roster_sync, RosterRequest, RosterSnapshot};
pub use scheduler::{run_scheduler, SchedulerOutcome, SchedulerReport, TargetResult};
