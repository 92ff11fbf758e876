//! Stat blocks - the frozen numeric attributes of a combatant.
//!
//! Stats are rolled by an external generator and handed to the engine as
//! plain integers. The engine never re-rolls or validates ranges; it only
//! consumes them in formulas. Non-negativity is enforced by the type (`u32`)
//! and by [`StatBlock::try_from_signed`] for generators that work in signed
//! arithmetic.

use strum::{EnumCount, IntoEnumIterator};

use crate::config::CombatConfig;

/// Names of the eleven attributes carried by every stat block.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Health,
    Morale,
    Buzz,
    Power,
    Aim,
    Tactics,
    Skill,
    Proficiency,
    Grit,
    Hull,
    Speed,
}

/// Generation tier of a stat.
///
/// Only the external generator cares about tiers; battle formulas read the
/// rolled integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatTier {
    /// High roll.
    Primary,
    /// Mid roll.
    Secondary,
    /// Low roll.
    #[default]
    Unassigned,
}

/// Per-stat tier assignment, indexed by [`StatKind`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatTiers {
    tiers: [StatTier; StatKind::COUNT],
}

impl StatTiers {
    pub fn get(&self, kind: StatKind) -> StatTier {
        self.tiers[kind as usize]
    }

    pub fn set(&mut self, kind: StatKind, tier: StatTier) {
        self.tiers[kind as usize] = tier;
    }

    /// Stats assigned to the given tier, in declaration order.
    pub fn with_tier(&self, tier: StatTier) -> impl Iterator<Item = StatKind> + '_ {
        StatKind::iter().filter(move |kind| self.get(*kind) == tier)
    }
}

/// Error returned when a generator hands over a negative stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("stat {stat} must be non-negative (got {value})")]
pub struct NegativeStat {
    pub stat: StatKind,
    pub value: i64,
}

/// Immutable-per-battle attributes of a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    /// Maximum health.
    pub health: u32,
    /// Maximum morale.
    pub morale: u32,
    /// Buzz capacity.
    pub buzz: u32,
    /// Melee damage scaling.
    pub power: u32,
    /// Ranged damage scaling.
    pub aim: u32,
    pub tactics: u32,
    pub skill: u32,
    pub proficiency: u32,
    /// Health-channel damage reduction, stronger when wounded or confident.
    pub grit: u32,
    /// Hull points; each point adds to the absorption pool.
    pub hull: u32,
    /// Initiative contribution.
    pub speed: u32,
}

impl StatBlock {
    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Health => self.health,
            StatKind::Morale => self.morale,
            StatKind::Buzz => self.buzz,
            StatKind::Power => self.power,
            StatKind::Aim => self.aim,
            StatKind::Tactics => self.tactics,
            StatKind::Skill => self.skill,
            StatKind::Proficiency => self.proficiency,
            StatKind::Grit => self.grit,
            StatKind::Hull => self.hull,
            StatKind::Speed => self.speed,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: u32) {
        let slot = match kind {
            StatKind::Health => &mut self.health,
            StatKind::Morale => &mut self.morale,
            StatKind::Buzz => &mut self.buzz,
            StatKind::Power => &mut self.power,
            StatKind::Aim => &mut self.aim,
            StatKind::Tactics => &mut self.tactics,
            StatKind::Skill => &mut self.skill,
            StatKind::Proficiency => &mut self.proficiency,
            StatKind::Grit => &mut self.grit,
            StatKind::Hull => &mut self.hull,
            StatKind::Speed => &mut self.speed,
        };
        *slot = value;
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, kind: StatKind, value: u32) -> Self {
        self.set(kind, value);
        self
    }

    /// Builds a stat block from signed values in [`StatKind`] declaration order.
    pub fn try_from_signed(values: [i64; StatKind::COUNT]) -> Result<Self, NegativeStat> {
        let mut block = Self::default();
        for (kind, value) in StatKind::iter().zip(values) {
            if value < 0 {
                return Err(NegativeStat { stat: kind, value });
            }
            block.set(kind, u32::try_from(value).unwrap_or(u32::MAX));
        }
        Ok(block)
    }

    /// Maximum hull pool: `hull_base + hull × hull_per_point`.
    pub fn max_hull_pool(&self, config: &CombatConfig) -> u32 {
        config
            .hull_base
            .saturating_add(self.hull.saturating_mul(config.hull_per_point))
    }
}
