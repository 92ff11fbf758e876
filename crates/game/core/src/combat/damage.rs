//! Damage calculation.

use crate::action::AttackStyle;
use crate::config::CombatConfig;
use crate::state::{Channel, Combatant, StatusKind};

use super::result::DamageResult;

// ============================================================================
// Context
// ============================================================================

/// Turn and positional facts the calculator cannot read from the combatants.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageContext {
    /// Sum of bonuses returned by the weapon's pre-attack hook.
    pub pre_attack_bonus: f64,
    /// Attacker's first attack this turn while its team holds initiative.
    pub first_action: bool,
    /// Attacks the attacker's team already landed this turn.
    pub combo_count: u32,
    /// Consecutive earlier hits by this attacker on this defender this round.
    pub focus_fire_count: u32,
    /// Defender stands next to a hazard tile.
    pub in_cover: bool,
}

// ============================================================================
// Helpers
// ============================================================================

/// Rounds half away from zero into the non-negative integer range.
///
/// The cast saturates: negative values and NaN become 0.
#[inline]
pub fn round_half_away(value: f64) -> u32 {
    value.round() as u32
}

/// Grit damage reduction for the health channel.
///
/// # Formula
///
/// ```text
/// factor = (1 - health_fraction) * grit_health_weight
///        + morale_fraction * grit_morale_weight
/// dr     = min(grit_dr_cap, factor * grit / 100)
/// ```
///
/// Both fractions must be read before the current hit lands.
pub fn grit_damage_reduction(
    health_fraction: f64,
    morale_fraction: f64,
    grit: u32,
    config: &CombatConfig,
) -> f64 {
    let health_fraction = health_fraction.clamp(0.0, 1.0);
    let morale_fraction = morale_fraction.clamp(0.0, 1.0);

    let factor = (1.0 - health_fraction) * config.grit_health_weight
        + morale_fraction * config.grit_morale_weight;
    let reduction = factor * f64::from(grit) / 100.0;

    reduction.min(config.grit_dr_cap).clamp(0.0, 1.0)
}

/// Health damage soaked by the hull pool.
///
/// Floors the percentage so the absorbed amount never exceeds
/// `absorb_percent` of `damage`, and never exceeds the pool itself.
pub fn hull_absorption(damage: u32, hull_pool: u32, absorb_percent: f64) -> u32 {
    if hull_pool == 0 || damage == 0 {
        return 0;
    }
    let cap = (f64::from(damage) * absorb_percent.clamp(0.0, 1.0)).floor() as u32;
    cap.min(hull_pool).min(damage)
}

fn scaling(
    style: AttackStyle,
    attacker: &Combatant,
    config: &CombatConfig,
) -> (&'static str, u32, f64) {
    match style {
        AttackStyle::Melee => ("power", attacker.stats.power, config.melee_power_scaling),
        AttackStyle::Ranged => ("aim", attacker.stats.aim, config.ranged_aim_scaling),
    }
}

/// Stage 1 alone: `base + round(stat * coefficient)`.
///
/// Also the damage an obstacle takes when it blocks the attack.
pub fn scaled_base(
    base_damage: u32,
    style: AttackStyle,
    attacker: &Combatant,
    config: &CombatConfig,
) -> u32 {
    let (_, stat, coefficient) = scaling(style, attacker, config);
    base_damage.saturating_add(round_half_away(f64::from(stat) * coefficient))
}

// ============================================================================
// Pipeline
// ============================================================================

/// Resolves one attack into final health and morale losses.
///
/// Stage order is fixed; each stage rounds its own output. A raw base of 0
/// short-circuits to [`DamageResult::zero`] without reporting any consumed
/// charges.
pub fn compute(
    base_damage: u32,
    style: AttackStyle,
    attacker: &Combatant,
    defender: &Combatant,
    ctx: &DamageContext,
    config: &CombatConfig,
) -> DamageResult {
    if base_damage == 0 {
        return DamageResult::zero();
    }

    let mut result = DamageResult::default();

    // 1. Base scaling
    let (stat_name, stat, coefficient) = scaling(style, attacker, config);
    let mut base = scaled_base(base_damage, style, attacker, config);
    result.note_both(format!(
        "{base_damage} base + {stat_name} {stat} x {coefficient} = {base}"
    ));

    // 2. Pre-attack bonuses, summed onto 1.0 and applied once
    let mut bonus = ctx.pre_attack_bonus;
    if ctx.first_action {
        bonus += config.first_action_bonus;
    }
    if ctx.combo_count > 0 {
        bonus += (f64::from(ctx.combo_count) * config.combo_step_bonus).min(config.combo_bonus_cap);
    }
    if defender.effects.has(StatusKind::Marked) {
        bonus += defender.effects.marked_bonus();
        result.mark_consumed = true;
    }
    if bonus.abs() > f64::EPSILON {
        base = round_half_away(f64::from(base) * (1.0 + bonus).max(0.0));
        result.note_both(format!("bonus {:+.0}% = {base}", bonus * 100.0));
    }

    // 3. Channel split
    let mut health_multiplier = defender.effects.incoming_damage_multiplier(Channel::Health);
    let mut morale_multiplier = defender.effects.incoming_damage_multiplier(Channel::Morale);
    match style {
        AttackStyle::Ranged => health_multiplier *= config.ranged_health_multiplier,
        AttackStyle::Melee => morale_multiplier *= config.melee_morale_multiplier,
    }
    let mut health = round_half_away(f64::from(base) * health_multiplier);
    let mut morale = round_half_away(f64::from(base) * morale_multiplier);
    result
        .health_breakdown
        .push(format!("health x {health_multiplier:.2} = {health}"));
    result
        .morale_breakdown
        .push(format!("morale x {morale_multiplier:.2} = {morale}"));

    // 4. Cover
    if ctx.in_cover {
        let keep = (1.0 - config.cover_reduction).clamp(0.0, 1.0);
        health = round_half_away(f64::from(health) * keep);
        morale = round_half_away(f64::from(morale) * keep);
        result.health_breakdown.push(format!("cover = {health}"));
        result.morale_breakdown.push(format!("cover = {morale}"));
    }

    // 5. Curse
    if let Some(multiplier) = defender.effects.curse_multiplier() {
        let multiplier = multiplier.max(0.0);
        health = round_half_away(f64::from(health) * multiplier);
        morale = round_half_away(f64::from(morale) * multiplier);
        result.curse_consumed = true;
        result
            .health_breakdown
            .push(format!("curse x {multiplier:.2} = {health}"));
        result
            .morale_breakdown
            .push(format!("curse x {multiplier:.2} = {morale}"));
    }

    // 6. Grit
    let reduction = grit_damage_reduction(
        defender.health_fraction(),
        defender.morale_fraction(),
        defender.stats.grit,
        config,
    );
    if reduction > 0.0 {
        health = round_half_away(f64::from(health) * (1.0 - reduction));
        result
            .health_breakdown
            .push(format!("grit -{:.0}% = {health}", reduction * 100.0));
    }

    // 7. Hull
    let absorbed = hull_absorption(health, defender.vitals.hull, config.hull_absorb_percent);
    if absorbed > 0 {
        health -= absorbed;
        result.hull_absorbed = absorbed;
        result
            .health_breakdown
            .push(format!("hull soaks {absorbed} = {health}"));
    }

    // 8. Focus fire
    if ctx.focus_fire_count > 0 {
        let multiplier = config.focus_fire_multiplier(ctx.focus_fire_count);
        morale = round_half_away(f64::from(morale) * multiplier);
        result.morale_breakdown.push(format!(
            "focus fire x{} ({multiplier:.2}) = {morale}",
            ctx.focus_fire_count + 1
        ));
    }

    result.health_damage = health;
    result.morale_damage = morale;
    result
}

impl DamageResult {
    fn note_both(&mut self, line: String) {
        self.health_breakdown.push(line.clone());
        self.morale_breakdown.push(line);
    }
}
