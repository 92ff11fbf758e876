//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the authoritative state and is the only task that
//! mutates it.

mod battle;

pub use battle::{BattleWorker, Command};
