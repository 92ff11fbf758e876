use crate::combat::DamageResult;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, CombatantStatus, ObstacleId, Team};

/// What became of the defender once damage landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fate {
    Survived,
    Surrendered,
    Destroyed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub damage: DamageResult,
    pub fate: Fate,
}

/// Result of one attack intent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    Hit(HitReport),
    /// An obstacle in the shared row or column took the attack.
    Blocked {
        obstacle: ObstacleId,
        damage: u32,
        destroyed: bool,
    },
    /// The attacker's miss chance beat the supplied roll.
    Missed,
    /// Rejected before any mutation.
    Invalid(InvalidReason),
}

impl ActionOutcome {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn hit(&self) -> Option<&HitReport> {
        match self {
            Self::Hit(report) => Some(report),
            _ => None,
        }
    }
}

/// Why an intent was refused. State is untouched when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidReason {
    #[error("the battle has ended")]
    BattleOver,

    #[error("no team is acting")]
    NoActingTeam,

    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("combatant {attacker} belongs to team {team}, but team {acting} is acting")]
    NotYourTurn {
        attacker: CombatantId,
        team: Team,
        acting: Team,
    },

    #[error("combatant {id} cannot act while {status}")]
    AttackerUnavailable {
        id: CombatantId,
        status: CombatantStatus,
    },

    #[error("combatant {0} is stunned")]
    Stunned(CombatantId),

    #[error("combatant {0} already attacked this turn")]
    AlreadyActed(CombatantId),

    #[error("not enough energy (required: {required}, available: {available})")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("no target selected")]
    NoTarget,

    #[error("combatant {0} is on the attacker's team")]
    FriendlyTarget(CombatantId),

    #[error("combatant {0} is no longer fighting")]
    TargetDown(CombatantId),

    #[error("target out of range (distance: {distance}, range: {range})")]
    OutOfRange { distance: u32, range: u32 },
}

impl GameError for InvalidReason {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActingTeam
            | Self::Stunned(_)
            | Self::AlreadyActed(_)
            | Self::InsufficientEnergy { .. }
            | Self::NotYourTurn { .. }
            | Self::OutOfRange { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "ACTION_BATTLE_OVER",
            Self::NoActingTeam => "ACTION_NO_ACTING_TEAM",
            Self::UnknownCombatant(_) => "ACTION_UNKNOWN_COMBATANT",
            Self::NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            Self::AttackerUnavailable { .. } => "ACTION_ATTACKER_UNAVAILABLE",
            Self::Stunned(_) => "ACTION_STUNNED",
            Self::AlreadyActed(_) => "ACTION_ALREADY_ACTED",
            Self::InsufficientEnergy { .. } => "ACTION_INSUFFICIENT_ENERGY",
            Self::NoTarget => "ACTION_NO_TARGET",
            Self::FriendlyTarget(_) => "ACTION_FRIENDLY_TARGET",
            Self::TargetDown(_) => "ACTION_TARGET_DOWN",
            Self::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
        }
    }
}
