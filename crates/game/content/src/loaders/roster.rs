//! Roster loader.
//!
//! Loads deployed combatants from RON files.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tactics_core::{
    CombatConfig, Combatant, CombatantId, Position, Role, StatBlock, StatusEffect, Team, Vitals,
    WeaponClass,
};

use crate::loaders::{LoadResult, read_file};

/// One roster entry as written in RON.
///
/// ```ron
/// (
///     id: 1,
///     name: "Brakka",
///     role: Vanguard,
///     team: A,
///     weapon: Melee,
///     stats: (health: 120, morale: 80, power: 12, grit: 6, hull: 4, speed: 3),
///     position: (1, 2),
///     captain: true,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: u32,
    pub name: String,
    pub role: Role,
    pub team: Team,
    pub weapon: WeaponClass,
    pub stats: StatBlock,
    pub position: (i32, i32),
    #[serde(default)]
    pub captain: bool,
    /// Starting pools; full when omitted.
    #[serde(default)]
    pub vitals: Option<Vitals>,
    /// Effects already active at deployment.
    #[serde(default)]
    pub effects: Vec<StatusEffect>,
}

impl UnitSpec {
    pub fn into_combatant(self, config: &CombatConfig) -> Combatant {
        let (x, y) = self.position;
        let mut unit = Combatant::new(
            CombatantId(self.id),
            self.name,
            self.role,
            self.team,
            self.weapon,
            self.stats,
            Position::new(x, y),
            config,
        );
        if self.captain {
            unit = unit.as_captain();
        }
        if let Some(vitals) = self.vitals {
            unit = unit.with_vitals(vitals);
        }
        for effect in self.effects {
            if !unit.effects.apply(effect) {
                tracing::warn!(
                    target: "content::loaders",
                    unit = %unit.id,
                    kind = %effect.kind,
                    "status store full, deployment effect dropped"
                );
            }
        }
        unit
    }
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `Vec<UnitSpec>`. Deployment rules (unique ids and tiles,
    /// bounds) are checked later by `BattleState::new`.
    pub fn load(path: &Path, config: &CombatConfig) -> LoadResult<Vec<Combatant>> {
        let content = read_file(path)?;
        let specs: Vec<UnitSpec> = ron::from_str(&content)
            .with_context(|| format!("Failed to parse roster RON at {}", path.display()))?;

        let roster: Vec<Combatant> = specs
            .into_iter()
            .map(|spec| spec.into_combatant(config))
            .collect();
        tracing::debug!(
            target: "content::loaders",
            path = %path.display(),
            units = roster.len(),
            "roster loaded"
        );
        Ok(roster)
    }
}
