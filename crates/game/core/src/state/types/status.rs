//! Status effect system for combatants.
//!
//! Status effects are temporary conditions that gate actions, modify incoming
//! damage, or deal damage over time.
//!
//! # Lifetimes
//!
//! An effect expires by one of two counters:
//! - `turns`: decremented once per owner turn, at turn start or turn end
//!   depending on the kind ([`TickPhase`])
//! - `charges`: decremented per incoming hit (Curse, Marked) or per use
//!   (FreeMove), independent of turns
//!
//! The effect is removed as soon as either counter reaches zero. Same-kind
//! applications follow the declared [`StackPolicy`] of the kind; call sites
//! never decide stacking on their own.

use arrayvec::ArrayVec;

use super::CombatantId;
use crate::config::CombatConfig;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    /// Loses `magnitude` health at the end of each owner turn.
    Bleed,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot attack or swap.
    Stun,
    /// Movement penalty of `magnitude` tiles.
    Daze,
    /// Movement penalty of `magnitude` tiles.
    Slowed,
    /// Cannot swap or be repositioned.
    Trap,

    // ========================================================================
    // Incoming damage modifiers
    // ========================================================================
    /// Attacks against the owner gain `+magnitude` while charges remain.
    Marked,
    /// Morale channel against the owner is multiplied by `1 + magnitude`.
    Rattled,
    /// Health channel against the owner is multiplied by `1 + magnitude`.
    Cracked,
    /// Both channels multiplied by `magnitude`; one charge per incoming hit.
    Curse,

    // ========================================================================
    // Other
    // ========================================================================
    /// Healing has no effect.
    HealBlock,
    /// The owner's attacks miss when the supplied roll is below `magnitude`.
    MissChance,
    /// The next swap does not consume the round budget.
    FreeMove,
    /// Cannot be knocked back.
    KnockbackImmune,
}

/// Behaviour when an effect of a kind already present is applied again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPolicy {
    /// Reset the counters and replace the magnitude of the existing instance.
    Refresh,
    /// Keep the existing instance and add an independent one.
    Stack,
}

/// When the turn counter of an effect is decremented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    TurnStart,
    TurnEnd,
    /// Only charges expire the effect.
    Never,
}

/// Declared per-kind policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusPolicy {
    pub stacking: StackPolicy,
    pub tick: TickPhase,
}

impl StatusKind {
    /// Stacking and tick policy table.
    pub const fn policy(self) -> StatusPolicy {
        use StackPolicy::*;
        use TickPhase::*;

        let (stacking, tick) = match self {
            StatusKind::Bleed => (Stack, TurnEnd),
            StatusKind::Stun => (Refresh, TurnEnd),
            StatusKind::Daze => (Refresh, TurnEnd),
            StatusKind::Slowed => (Refresh, TurnEnd),
            StatusKind::Trap => (Refresh, TurnEnd),
            StatusKind::Marked => (Refresh, TurnEnd),
            StatusKind::Rattled => (Refresh, TurnEnd),
            StatusKind::Cracked => (Refresh, TurnEnd),
            StatusKind::Curse => (Refresh, Never),
            StatusKind::HealBlock => (Refresh, TurnEnd),
            StatusKind::MissChance => (Refresh, TurnEnd),
            StatusKind::FreeMove => (Refresh, Never),
            StatusKind::KnockbackImmune => (Refresh, TurnStart),
        };
        StatusPolicy { stacking, tick }
    }
}

/// Damage channel an incoming modifier applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    Health,
    Morale,
}

/// A single status effect instance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Remaining owner turns, if the effect is turn-limited.
    pub turns: Option<u32>,
    /// Remaining hits or uses, if the effect is charge-limited.
    pub charges: Option<u32>,
    /// Kind-specific strength (damage per tick, multiplier, bonus, percent).
    pub magnitude: f64,
    /// Combatant that applied the effect.
    pub source: Option<CombatantId>,
}

impl StatusEffect {
    pub const fn new(
        kind: StatusKind,
        turns: Option<u32>,
        charges: Option<u32>,
        magnitude: f64,
    ) -> Self {
        Self {
            kind,
            turns,
            charges,
            magnitude,
            source: None,
        }
    }

    /// Turn-limited effect of the given kind.
    pub const fn timed(kind: StatusKind, turns: u32, magnitude: f64) -> Self {
        Self::new(kind, Some(turns), None, magnitude)
    }

    pub const fn bleed(damage_per_turn: u32, turns: u32) -> Self {
        Self::timed(StatusKind::Bleed, turns, damage_per_turn as f64)
    }

    pub const fn stun(turns: u32) -> Self {
        Self::timed(StatusKind::Stun, turns, 0.0)
    }

    pub const fn trap(turns: u32) -> Self {
        Self::timed(StatusKind::Trap, turns, 0.0)
    }

    /// `bonus` on the next `hits` attacks, lapsing after `turns` owner turns.
    pub const fn marked(bonus: f64, hits: u32, turns: u32) -> Self {
        Self::new(StatusKind::Marked, Some(turns), Some(hits), bonus)
    }

    /// Multiplies both channels by `multiplier` for the next `hits` attacks.
    pub const fn curse(multiplier: f64, hits: u32) -> Self {
        Self::new(StatusKind::Curse, None, Some(hits), multiplier)
    }

    pub const fn free_move(uses: u32) -> Self {
        Self::new(StatusKind::FreeMove, None, Some(uses), 0.0)
    }

    #[must_use]
    pub const fn with_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }

    /// True once either counter has run out.
    pub fn is_expired(&self) -> bool {
        self.turns == Some(0) || self.charges == Some(0)
    }
}

/// Everything that happened while ticking a store at a turn boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Health lost to bleeding this tick.
    pub bleed_damage: u32,
    /// Kinds removed because their counters ran out.
    pub expired: Vec<StatusKind>,
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Applies an effect according to the kind's stacking policy.
    ///
    /// Returns false when the effect was dropped: it arrived already expired,
    /// or a new instance was needed and the store is full.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if effect.is_expired() {
            return false;
        }

        if effect.kind.policy().stacking == StackPolicy::Refresh
            && let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind)
        {
            *existing = effect;
            return true;
        }

        self.effects.try_push(effect).is_ok()
    }

    /// Removes every instance of a kind immediately.
    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Spends one charge of the first instance of `kind`.
    ///
    /// Returns true if the effect was cleared by this charge.
    pub fn consume_charge(&mut self, kind: StatusKind) -> bool {
        let Some(effect) = self
            .effects
            .iter_mut()
            .find(|e| e.kind == kind && e.charges.is_some())
        else {
            return false;
        };

        if let Some(charges) = effect.charges.as_mut() {
            debug_assert!(*charges > 0, "live {kind} effect with zero charges");
            *charges = charges.saturating_sub(1);
        }

        let cleared = effect.is_expired();
        self.remove_expired();
        cleared
    }

    /// Decrements effects that tick at the owner's turn start.
    pub fn tick_turn_start(&mut self) -> TickReport {
        self.tick(TickPhase::TurnStart, 0)
    }

    /// Collects bleed damage, then decrements effects that tick at turn end.
    ///
    /// Bleeding is collected before decrementing so a one-turn bleed still
    /// deals its damage.
    pub fn tick_turn_end(&mut self) -> TickReport {
        let bleed = self
            .effects
            .iter()
            .filter(|e| e.kind == StatusKind::Bleed)
            .map(|e| e.magnitude.max(0.0).round() as u32)
            .fold(0u32, u32::saturating_add);
        self.tick(TickPhase::TurnEnd, bleed)
    }

    fn tick(&mut self, phase: TickPhase, bleed_damage: u32) -> TickReport {
        for effect in self.effects.iter_mut() {
            if effect.kind.policy().tick != phase {
                continue;
            }
            if let Some(turns) = effect.turns.as_mut() {
                debug_assert!(*turns > 0, "live {} effect with zero turns", effect.kind);
                *turns = turns.saturating_sub(1);
            }
        }

        let expired = self
            .effects
            .iter()
            .filter(|e| e.is_expired())
            .map(|e| e.kind)
            .collect();
        self.remove_expired();

        TickReport {
            bleed_damage,
            expired,
        }
    }

    /// Drops every effect whose counters ran out.
    pub fn remove_expired(&mut self) {
        self.effects.retain(|e| !e.is_expired());
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Checks if a specific status effect is active.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Magnitude of the first instance of `kind`.
    pub fn magnitude(&self, kind: StatusKind) -> Option<f64> {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.magnitude)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stun)
    }

    pub fn is_trapped(&self) -> bool {
        self.has(StatusKind::Trap)
    }

    pub fn is_heal_blocked(&self) -> bool {
        self.has(StatusKind::HealBlock)
    }

    pub fn can_be_knocked_back(&self) -> bool {
        !self.has(StatusKind::KnockbackImmune)
    }

    pub fn has_free_move(&self) -> bool {
        self.has(StatusKind::FreeMove)
    }

    /// Tiles removed from the owner's movement allowance.
    pub fn movement_penalty(&self) -> u32 {
        self.effects
            .iter()
            .filter(|e| matches!(e.kind, StatusKind::Daze | StatusKind::Slowed))
            .map(|e| e.magnitude.max(0.0).round() as u32)
            .sum()
    }

    /// Multiplier applied to a damage channel aimed at the owner.
    pub fn incoming_damage_multiplier(&self, channel: Channel) -> f64 {
        let kind = match channel {
            Channel::Health => StatusKind::Cracked,
            Channel::Morale => StatusKind::Rattled,
        };
        1.0 + self.magnitude(kind).unwrap_or(0.0).max(0.0)
    }

    /// Additive damage bonus granted to attackers while Marked.
    pub fn marked_bonus(&self) -> f64 {
        self.magnitude(StatusKind::Marked).unwrap_or(0.0)
    }

    pub fn curse_multiplier(&self) -> Option<f64> {
        self.magnitude(StatusKind::Curse)
    }

    /// Percent chance (0-100) that the owner's attacks miss.
    pub fn miss_chance(&self) -> u32 {
        self.magnitude(StatusKind::MissChance)
            .map(|m| m.clamp(0.0, 100.0).round() as u32)
            .unwrap_or(0)
    }

    /// Returns an iterator over all active effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
