//! Damage calculator output.

/// Final per-channel losses for one attack, plus how they were reached.
///
/// Produced by [`compute`](super::compute) and consumed within a single
/// action; the executor applies it and discards it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    /// Health lost after every mitigation stage, hull already subtracted.
    pub health_damage: u32,
    pub morale_damage: u32,
    /// Portion of the health channel soaked by the hull pool.
    pub hull_absorbed: u32,

    /// The defender's curse multiplied this hit and owes one charge.
    pub curse_consumed: bool,
    /// The defender's mark added its bonus and owes one charge.
    pub mark_consumed: bool,

    pub health_breakdown: Vec<String>,
    pub morale_breakdown: Vec<String>,
}

impl DamageResult {
    /// Result of an attack that deals nothing and touches no charges.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.health_damage == 0 && self.morale_damage == 0 && self.hull_absorbed == 0
    }

    /// Health-channel damage before hull absorption.
    pub fn gross_health_damage(&self) -> u32 {
        self.health_damage.saturating_add(self.hull_absorbed)
    }
}
