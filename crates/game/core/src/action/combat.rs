use crate::state::{CombatantId, WeaponClass};

/// How an attack reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackStyle {
    /// Adjacent only; scales with Power, hits morale harder.
    Melee,
    /// Any distance within range; scales with Aim, hits health harder.
    Ranged,
}

impl From<WeaponClass> for AttackStyle {
    fn from(class: WeaponClass) -> Self {
        match class {
            WeaponClass::Melee => AttackStyle::Melee,
            WeaponClass::Ranged => AttackStyle::Ranged,
        }
    }
}

/// Resolved weapon/relic parameters for one attack.
///
/// Dice are rolled by the caller: `base_damage` and `hit_roll` arrive
/// already resolved, which keeps the engine deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponContext {
    /// Effect catalog identifier for pre/post-attack hooks.
    pub effect_id: Option<String>,
    pub base_damage: u32,
    pub style: AttackStyle,
    /// Energy override; the configured attack cost applies when `None`.
    pub energy_cost: Option<u32>,
    /// Maximum Chebyshev distance for ranged attacks; unlimited when `None`.
    pub range: Option<u32>,
    /// Percentile roll (0-99) checked against the attacker's miss chance.
    pub hit_roll: Option<u32>,
}

impl WeaponContext {
    pub fn new(style: AttackStyle, base_damage: u32) -> Self {
        Self {
            effect_id: None,
            base_damage,
            style,
            energy_cost: None,
            range: None,
            hit_roll: None,
        }
    }

    pub fn melee(base_damage: u32) -> Self {
        Self::new(AttackStyle::Melee, base_damage)
    }

    pub fn ranged(base_damage: u32) -> Self {
        Self::new(AttackStyle::Ranged, base_damage)
    }

    #[must_use]
    pub fn with_effect(mut self, effect_id: impl Into<String>) -> Self {
        self.effect_id = Some(effect_id.into());
        self
    }

    #[must_use]
    pub fn with_energy_cost(mut self, cost: u32) -> Self {
        self.energy_cost = Some(cost);
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn with_hit_roll(mut self, roll: u32) -> Self {
        self.hit_roll = Some(roll);
        self
    }
}

/// External request to attack: the sole entry point for driving combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackIntent {
    pub attacker: CombatantId,
    /// `None` when the caller has not picked a target.
    pub defender: Option<CombatantId>,
    pub weapon: WeaponContext,
}

impl AttackIntent {
    pub fn new(attacker: CombatantId, defender: CombatantId, weapon: WeaponContext) -> Self {
        Self {
            attacker,
            defender: Some(defender),
            weapon,
        }
    }

    pub fn untargeted(attacker: CombatantId, weapon: WeaponContext) -> Self {
        Self {
            attacker,
            defender: None,
            weapon,
        }
    }
}
