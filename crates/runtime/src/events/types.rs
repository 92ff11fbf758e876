//! Event types for the turn topic.

use serde::{Deserialize, Serialize};
use tactics_core::{BattleEvent, Team};

/// Events related to turn management (lightweight)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Round, turn, and battle-end transitions reported by the engine.
    Transition(BattleEvent),

    /// The auto-turn for `team` will resolve at `deadline_ms` (runtime clock).
    AutoTurnScheduled { team: Team, deadline_ms: u64 },

    /// The auto-turn for `team` ran and submitted `actions` actions.
    AutoTurnResolved { team: Team, actions: usize },
}
