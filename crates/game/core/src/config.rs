use crate::state::Team;

/// Combat tunables and compile-time capacities.
///
/// Every formula constant the engine reads lives here so balance changes
/// never touch engine code. Hosts load overrides from TOML; missing keys fall
/// back to [`CombatConfig::default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    // ===== damage scaling =====
    /// Power coefficient for melee base scaling.
    pub melee_power_scaling: f64,
    /// Aim coefficient for ranged base scaling.
    pub ranged_aim_scaling: f64,
    /// Health-channel multiplier applied to ranged attacks.
    pub ranged_health_multiplier: f64,
    /// Morale-channel multiplier applied to melee attacks.
    pub melee_morale_multiplier: f64,

    // ===== mitigation =====
    /// Fraction removed from both channels when the defender is next to a hazard.
    pub cover_reduction: f64,
    /// Weight of missing health in the grit factor.
    pub grit_health_weight: f64,
    /// Weight of current morale in the grit factor.
    pub grit_morale_weight: f64,
    /// Upper bound on grit damage reduction.
    pub grit_dr_cap: f64,
    /// Flat hull pool every combatant starts with.
    pub hull_base: u32,
    /// Hull pool added per hull stat point.
    pub hull_per_point: u32,
    /// Largest fraction of health damage the hull pool may soak per hit.
    pub hull_absorb_percent: f64,

    // ===== bonuses =====
    /// Morale multipliers by consecutive-hit count; the last entry repeats.
    pub focus_fire_table: Vec<f64>,
    /// Bonus for a unit's first attack in a turn while its team holds initiative.
    pub first_action_bonus: f64,
    /// Bonus added per attack already landed by the team this turn.
    pub combo_step_bonus: f64,
    /// Upper bound on the combo bonus.
    pub combo_bonus_cap: f64,

    // ===== morale =====
    /// Units whose morale fraction drops below this value surrender.
    pub surrender_threshold: f64,

    // ===== turn economy =====
    /// Swaps a team may spend per round; FreeMove swaps are not counted.
    pub max_swaps_per_round: u32,
    /// Team energy granted at the start of each of its turns.
    pub energy_per_turn: u32,
    /// Energy spent by an attack unless the weapon overrides it.
    pub attack_energy_cost: u32,
    /// Reserve gained per unspent energy point at turn end.
    pub energy_to_reserve: u32,
    /// Buzz lost by an attacker after each action.
    pub buzz_decay_per_action: u32,

    // ===== hosting =====
    /// Delay before the non-interactive team's turn auto-resolves.
    pub auto_turn_delay_ms: u64,
    /// Team driven by a human; `None` means both sides auto-resolve.
    pub interactive_team: Option<Team>,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 16;
    pub const MAX_COMBATANTS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FOCUS_FIRE_TABLE: [f64; 4] = [1.0, 1.15, 1.3, 1.5];

    pub fn new() -> Self {
        Self {
            melee_power_scaling: 1.25,
            ranged_aim_scaling: 1.0,
            ranged_health_multiplier: 1.1,
            melee_morale_multiplier: 1.25,
            cover_reduction: 0.25,
            grit_health_weight: 0.50,
            grit_morale_weight: 0.40,
            grit_dr_cap: 0.40,
            hull_base: 0,
            hull_per_point: 5,
            hull_absorb_percent: 0.5,
            focus_fire_table: Self::DEFAULT_FOCUS_FIRE_TABLE.to_vec(),
            first_action_bonus: 0.15,
            combo_step_bonus: 0.05,
            combo_bonus_cap: 0.20,
            surrender_threshold: 0.20,
            max_swaps_per_round: 2,
            energy_per_turn: 6,
            attack_energy_cost: 2,
            energy_to_reserve: 1,
            buzz_decay_per_action: 5,
            auto_turn_delay_ms: 750,
            interactive_team: Some(Team::A),
        }
    }

    /// Focus-fire morale multiplier for the given consecutive-hit count.
    ///
    /// The table is capped at its last entry; an empty table means no bonus.
    pub fn focus_fire_multiplier(&self, consecutive_hits: u32) -> f64 {
        let last = self.focus_fire_table.len().saturating_sub(1);
        let index = (consecutive_hits as usize).min(last);
        self.focus_fire_table.get(index).copied().unwrap_or(1.0)
    }

    /// True when the given team's turns resolve without human input.
    pub fn is_auto_team(&self, team: Team) -> bool {
        self.interactive_team != Some(team)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
