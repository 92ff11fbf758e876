//! Refusals from the turn controller.
//!
//! Attack intents never fail with an error; they resolve to
//! [`ActionOutcome::Invalid`](super::ActionOutcome::Invalid). The operations
//! here are bookkeeping requests that the caller may retry after correcting.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, Team};

/// Errors that can occur during turn operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("the battle has ended")]
    BattleOver,

    #[error("the battle has not started")]
    NotStarted,

    #[error("the battle has already started")]
    AlreadyStarted,

    #[error("team {team} cannot end the turn: acting team is {acting:?}")]
    NotYourTurn { team: Team, acting: Option<Team> },
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleOver => ErrorSeverity::Validation,
            Self::NotStarted | Self::AlreadyStarted | Self::NotYourTurn { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "TURN_BATTLE_OVER",
            Self::NotStarted => "TURN_NOT_STARTED",
            Self::AlreadyStarted => "TURN_ALREADY_STARTED",
            Self::NotYourTurn { .. } => "TURN_NOT_YOUR_TURN",
        }
    }
}

/// Errors that can occur when two allies exchange tiles.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("the battle has ended")]
    BattleOver,

    #[error("no team is acting")]
    NoActingTeam,

    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("a combatant cannot swap with itself")]
    SameCombatant,

    #[error("combatant {id} is not on the acting team {acting}")]
    WrongTeam { id: CombatantId, acting: Team },

    #[error("combatant {0} is not on the field")]
    Unavailable(CombatantId),

    #[error("combatant {0} is stunned")]
    Stunned(CombatantId),

    #[error("combatant {0} is trapped")]
    Trapped(CombatantId),

    #[error("combatant {0} already swapped this round")]
    AlreadySwapped(CombatantId),

    #[error("swap budget exhausted ({max} per round)")]
    BudgetExhausted { max: u32 },
}

impl GameError for SwapError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BudgetExhausted { .. }
            | Self::AlreadySwapped(_)
            | Self::Stunned(_)
            | Self::Trapped(_)
            | Self::NoActingTeam => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "SWAP_BATTLE_OVER",
            Self::NoActingTeam => "SWAP_NO_ACTING_TEAM",
            Self::UnknownCombatant(_) => "SWAP_UNKNOWN_COMBATANT",
            Self::SameCombatant => "SWAP_SAME_COMBATANT",
            Self::WrongTeam { .. } => "SWAP_WRONG_TEAM",
            Self::Unavailable(_) => "SWAP_UNAVAILABLE",
            Self::Stunned(_) => "SWAP_STUNNED",
            Self::Trapped(_) => "SWAP_TRAPPED",
            Self::AlreadySwapped(_) => "SWAP_ALREADY_SWAPPED",
            Self::BudgetExhausted { .. } => "SWAP_BUDGET_EXHAUSTED",
        }
    }
}

/// Errors that can occur when restoring health outside an attack.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HealError {
    #[error("the battle has ended")]
    BattleOver,

    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is no longer fighting")]
    TargetDown(CombatantId),
}

impl GameError for HealError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "HEAL_BATTLE_OVER",
            Self::UnknownCombatant(_) => "HEAL_UNKNOWN_COMBATANT",
            Self::TargetDown(_) => "HEAL_TARGET_DOWN",
        }
    }
}
