//! Advisory notifications for presentation layers.
//!
//! The engine appends events while it mutates state and the host drains them
//! with [`BattleEngine::take_events`](super::BattleEngine::take_events).
//! Nothing in the engine reads them back.

use crate::state::{CombatantId, ObstacleId, Position, StatusKind, Team};

/// Team-level pools that change during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resource {
    Energy,
    Reserve,
    Swaps,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
        first: Team,
    },
    TurnStarted {
        round: u32,
        team: Team,
    },
    TurnEnded {
        round: u32,
        team: Team,
    },
    Damaged {
        target: CombatantId,
        amount: u32,
        hull_absorbed: u32,
        source: Option<CombatantId>,
    },
    MoraleDamaged {
        target: CombatantId,
        amount: u32,
        source: Option<CombatantId>,
    },
    Healed {
        target: CombatantId,
        amount: u32,
    },
    Died {
        target: CombatantId,
    },
    Surrendered {
        target: CombatantId,
    },
    StatusApplied {
        target: CombatantId,
        kind: StatusKind,
    },
    StatusExpired {
        target: CombatantId,
        kind: StatusKind,
    },
    ResourceChanged {
        team: Team,
        resource: Resource,
        value: u32,
    },
    BuzzChanged {
        target: CombatantId,
        value: u32,
    },
    Missed {
        attacker: CombatantId,
        defender: CombatantId,
    },
    Swapped {
        first: CombatantId,
        second: CombatantId,
    },
    Displaced {
        target: CombatantId,
        from: Position,
        to: Position,
    },
    ObstacleHit {
        obstacle: ObstacleId,
        damage: u32,
        destroyed: bool,
    },
    BattleEnded {
        winner: Option<Team>,
    },
}

impl BattleEvent {
    /// Round and turn transitions, as opposed to per-unit changes.
    pub fn is_turn_transition(&self) -> bool {
        matches!(
            self,
            Self::RoundStarted { .. }
                | Self::TurnStarted { .. }
                | Self::TurnEnded { .. }
                | Self::BattleEnded { .. }
        )
    }
}
