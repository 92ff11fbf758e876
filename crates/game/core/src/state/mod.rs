//! Authoritative battle state representation.
//!
//! This module owns the roster, battlefield, and turn bookkeeping. Hosts clone
//! or query this state but mutate it exclusively through the engine.
pub mod error;
pub mod types;

pub use error::InitializationError;
pub use types::{
    AutoTurnTimer, Battlefield, Channel, Combatant, CombatantId, CombatantStatus, Obstacle,
    ObstacleHit, ObstacleId, Position, Role, StackPolicy, StatusEffect, StatusEffects, StatusKind,
    StatusPolicy, Team, TeamState, TickPhase, TickReport, TurnPhase, TurnState, UnitFlags, Vitals,
    WeaponClass,
};

use crate::config::CombatConfig;

/// Whether the battle still accepts actions, and who won once it stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    #[default]
    Active,
    /// `None` when both sides fell at once.
    Ended { winner: Option<Team> },
}

/// Canonical snapshot of one battle.
///
/// The roster is explicit and owned here; nothing rediscovers units by
/// scanning elsewhere.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub roster: Vec<Combatant>,
    pub battlefield: Battlefield,
    pub turn: TurnState,
    pub status: BattleStatus,
}

impl BattleState {
    /// Validates a deployment and builds the initial state.
    pub fn new(
        roster: Vec<Combatant>,
        battlefield: Battlefield,
    ) -> Result<Self, InitializationError> {
        if roster.len() > CombatConfig::MAX_COMBATANTS {
            return Err(InitializationError::RosterFull {
                max: CombatConfig::MAX_COMBATANTS,
                got: roster.len(),
            });
        }

        for (index, combatant) in roster.iter().enumerate() {
            let earlier = &roster[..index];
            if earlier.iter().any(|c| c.id == combatant.id) {
                return Err(InitializationError::DuplicateId { id: combatant.id });
            }

            let Some(position) = combatant.position else {
                continue;
            };
            if !battlefield.contains(position) {
                return Err(InitializationError::OutOfBounds {
                    id: combatant.id,
                    position,
                });
            }
            if earlier.iter().any(|c| c.position == Some(position))
                || battlefield.obstacle_at(position).is_some()
            {
                return Err(InitializationError::PositionOccupied { position });
            }
        }

        Ok(Self {
            roster,
            battlefield,
            turn: TurnState::new(),
            status: BattleStatus::Active,
        })
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == BattleStatus::Active
    }

    /// Winner once ended; `None` while running or after a draw.
    pub fn winner(&self) -> Option<Team> {
        match self.status {
            BattleStatus::Ended { winner } => winner,
            BattleStatus::Active => None,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.roster.iter_mut().find(|c| c.id == id)
    }

    /// Members of a team, including surrendered and destroyed ones.
    pub fn team_members(&self, team: Team) -> impl Iterator<Item = &Combatant> {
        self.roster.iter().filter(move |c| c.team == team)
    }

    /// Combatant standing on a tile.
    pub fn occupant(&self, position: Position) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.position == Some(position))
    }

    /// Tile is on the field, unoccupied, and free of obstacles.
    pub fn is_free(&self, position: Position) -> bool {
        self.battlefield.contains(position)
            && self.occupant(position).is_none()
            && self.battlefield.obstacle_at(position).is_none()
    }

    /// Number of team members still able to fight.
    pub fn active_count(&self, team: Team) -> usize {
        self.team_members(team).filter(|c| c.is_active()).count()
    }
}
