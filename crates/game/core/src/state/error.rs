//! State construction errors.
//!
//! Raised while assembling a battle from an external roster; once a
//! [`BattleState`](super::BattleState) exists these can no longer occur.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    /// Roster exceeds the compile-time capacity.
    #[error("roster is full (max: {max}, got: {got})")]
    RosterFull { max: usize, got: usize },

    /// Two roster entries share an id.
    #[error("combatant id {id} is used more than once")]
    DuplicateId { id: CombatantId },

    /// Two combatants, or a combatant and an obstacle, share a tile.
    #[error("position {position} is occupied more than once")]
    PositionOccupied { position: Position },

    /// Deployment tile outside the battlefield.
    #[error("combatant {id} deployed outside the battlefield at {position}")]
    OutOfBounds { id: CombatantId, position: Position },
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RosterFull { .. } => "INIT_ROSTER_FULL",
            Self::DuplicateId { .. } => "INIT_DUPLICATE_ID",
            Self::PositionOccupied { .. } => "INIT_POSITION_OCCUPIED",
            Self::OutOfBounds { .. } => "INIT_OUT_OF_BOUNDS",
        }
    }
}
