//! Combatant state.
//!
//! A combatant is created at deployment with stats frozen from generation,
//! mutated whenever it is attacked, healed, or a turn boundary passes, and
//! never removed from the roster: destruction clears its position so stale
//! references can still be recognised.

use bitflags::bitflags;

use super::{CombatantId, Position, StatusEffects, Team};
use crate::config::CombatConfig;
use crate::stats::StatBlock;

/// Battlefield role of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Vanguard,
    Striker,
    Skirmisher,
    Marksman,
    Medic,
    Engineer,
}

/// Weapon class carried into battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponClass {
    Melee,
    Ranged,
}

/// Lifecycle state of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantStatus {
    #[default]
    Active,
    /// Terminal: stays on the field, never acts again.
    Surrendered,
    /// Terminal: health reached zero and the unit left the field.
    Destroyed,
}

bitflags! {
    /// Transient per-round flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u8 {
        /// Attacked during the current turn.
        const HAS_ACTED = 1;
        /// Next attack this turn is the unit's first.
        const FIRST_ACTION = 1 << 1;
        /// Already swapped this round.
        const SWAPPED = 1 << 2;
        /// Losing this unit loses the battle.
        const CAPTAIN = 1 << 3;
    }
}

impl UnitFlags {
    /// Flags cleared at every round start.
    pub const ROUND_SCOPED: Self = Self::HAS_ACTED
        .union(Self::FIRST_ACTION)
        .union(Self::SWAPPED);
}

/// Current pool values. Maximums come from the stat block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub health: u32,
    pub morale: u32,
    pub buzz: u32,
    pub hull: u32,
}

/// Complete combatant state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    // === Identity ===
    pub id: CombatantId,
    pub name: String,
    pub role: Role,
    pub team: Team,
    pub weapon: WeaponClass,

    // === Stats and pools ===
    pub stats: StatBlock,
    pub vitals: Vitals,
    /// Maximum hull pool, computed once at deployment.
    pub max_hull: u32,

    /// Tile occupied on the battlefield. None once destroyed.
    pub position: Option<Position>,
    pub status: CombatantStatus,
    pub effects: StatusEffects,

    // === Per-round counters ===
    pub flags: UnitFlags,
    /// Consecutive hits landed on this unit by `last_attacker`.
    pub focus_fire_stacks: u32,
    pub last_attacker: Option<CombatantId>,
}

impl Combatant {
    /// Deploys a combatant with full pools.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        role: Role,
        team: Team,
        weapon: WeaponClass,
        stats: StatBlock,
        position: Position,
        config: &CombatConfig,
    ) -> Self {
        let max_hull = stats.max_hull_pool(config);
        let vitals = Vitals {
            health: stats.health,
            morale: stats.morale,
            buzz: stats.buzz,
            hull: max_hull,
        };

        Self {
            id,
            name: name.into(),
            role,
            team,
            weapon,
            stats,
            vitals,
            max_hull,
            position: Some(position),
            status: CombatantStatus::Active,
            effects: StatusEffects::empty(),
            flags: UnitFlags::empty(),
            focus_fire_stacks: 0,
            last_attacker: None,
        }
    }

    #[must_use]
    pub fn as_captain(mut self) -> Self {
        self.flags.insert(UnitFlags::CAPTAIN);
        self
    }

    /// Overrides current pools, clamped to their maximums.
    #[must_use]
    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = Vitals {
            health: vitals.health.min(self.stats.health),
            morale: vitals.morale.min(self.stats.morale),
            buzz: vitals.buzz.min(self.stats.buzz),
            hull: vitals.hull.min(self.max_hull),
        };
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == CombatantStatus::Active
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.status == CombatantStatus::Destroyed
    }

    #[inline]
    pub fn is_captain(&self) -> bool {
        self.flags.contains(UnitFlags::CAPTAIN)
    }

    /// Current health over maximum, in `[0, 1]`.
    pub fn health_fraction(&self) -> f64 {
        fraction(self.vitals.health, self.stats.health)
    }

    /// Current morale over maximum, in `[0, 1]`.
    pub fn morale_fraction(&self) -> f64 {
        fraction(self.vitals.morale, self.stats.morale)
    }

    /// Removes health, never going below zero. Returns the amount removed.
    pub fn lose_health(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.vitals.health);
        self.vitals.health -= lost;
        lost
    }

    /// Removes morale, never going below zero. Returns the amount removed.
    pub fn lose_morale(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.vitals.morale);
        self.vitals.morale -= lost;
        lost
    }

    /// Drains the hull pool.
    pub fn drain_hull(&mut self, amount: u32) {
        debug_assert!(
            amount <= self.vitals.hull,
            "hull drain {amount} exceeds pool {}",
            self.vitals.hull
        );
        self.vitals.hull = self.vitals.hull.saturating_sub(amount);
    }

    /// Restores health up to the maximum. Returns the amount restored.
    pub fn restore_health(&mut self, amount: u32) -> u32 {
        let missing = self.stats.health.saturating_sub(self.vitals.health);
        let restored = amount.min(missing);
        self.vitals.health += restored;
        restored
    }

    /// Restores buzz up to capacity. Returns the amount restored.
    pub fn restore_buzz(&mut self, amount: u32) -> u32 {
        let missing = self.stats.buzz.saturating_sub(self.vitals.buzz);
        let restored = amount.min(missing);
        self.vitals.buzz += restored;
        restored
    }

    /// Resets per-round flags. The focus-fire streak outlives the round.
    pub fn reset_round(&mut self) {
        self.flags.remove(UnitFlags::ROUND_SCOPED);
    }

    /// Records a hit from `attacker`, extending its streak or starting a new one.
    pub fn record_hit_from(&mut self, attacker: CombatantId) {
        if self.last_attacker == Some(attacker) {
            self.focus_fire_stacks += 1;
        } else {
            self.last_attacker = Some(attacker);
            self.focus_fire_stacks = 1;
        }
    }

    /// Drops the focus-fire streak.
    pub fn clear_focus_fire(&mut self) {
        self.focus_fire_stacks = 0;
        self.last_attacker = None;
    }
}

fn fraction(current: u32, maximum: u32) -> f64 {
    if maximum == 0 {
        return 0.0;
    }
    (f64::from(current) / f64::from(maximum)).clamp(0.0, 1.0)
}
