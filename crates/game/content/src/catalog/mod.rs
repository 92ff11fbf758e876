//! Data-driven weapon and relic effects.
//!
//! An [`EffectSpec`] describes one effect id as two lists: pre-attack bonuses
//! summed into damage stage 2, and post-attack effects translated into
//! [`HookCommand`]s. [`EffectCatalog::into_registry`] turns a catalog into the
//! [`EffectRegistry`] the engine consumes.
//!
//! ```ron
//! [
//!     (
//!         id: "executioner",
//!         pre: [DefenderBelowHealth(threshold: 0.5, bonus: 0.25)],
//!         post: [ApplyStatus(target: Defender, effect: (kind: Bleed, turns: Some(2), charges: None, magnitude: 5.0, source: None))],
//!     ),
//! ]
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tactics_core::{
    CombatantId, EffectHook, EffectRegistry, Fate, HookCommand, PostAttackContext,
    PreAttackContext, StatusEffect,
};

/// Pre-attack bonus bodies. Matching entries are summed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PreBonusSpec {
    /// `bonus` when the defender's health fraction is below `threshold`.
    DefenderBelowHealth { threshold: f64, bonus: f64 },
    /// `bonus` when the attacker qualifies for the first-action bonus.
    FirstAction { bonus: f64 },
    Flat { bonus: f64 },
}

impl PreBonusSpec {
    fn bonus(&self, ctx: &PreAttackContext<'_>) -> f64 {
        match *self {
            Self::DefenderBelowHealth { threshold, bonus } => {
                if ctx.defender.health_fraction() < threshold {
                    bonus
                } else {
                    0.0
                }
            }
            Self::FirstAction { bonus } => {
                if ctx.first_action {
                    bonus
                } else {
                    0.0
                }
            }
            Self::Flat { bonus } => bonus,
        }
    }
}

/// Which side of the exchange a post effect lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Attacker,
    Defender,
}

/// Post-attack effect bodies, applied in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PostEffectSpec {
    /// Applies `effect` with the attacker recorded as its source.
    ApplyStatus {
        target: EffectTarget,
        effect: StatusEffect,
    },
    /// Unmitigated health loss for every active ally of the defender adjacent
    /// to it.
    Splash { amount: u32 },
    /// Pushes a surviving defender away from the attacker.
    Knockback { distance: u32 },
    RefundEnergy { amount: u32 },
    HealSelf { amount: u32 },
}

impl PostEffectSpec {
    fn commands(&self, ctx: &PostAttackContext<'_>, out: &mut Vec<HookCommand>) {
        let attacker = ctx.attacker;
        let defender = ctx.defender;
        match self {
            Self::ApplyStatus { target, effect } => {
                let target = match target {
                    EffectTarget::Attacker => attacker.id,
                    EffectTarget::Defender => defender.id,
                };
                out.push(HookCommand::ApplyStatus {
                    target,
                    effect: effect.with_source(attacker.id),
                });
            }
            Self::Splash { amount } => {
                let Some(center) = defender.position else {
                    return;
                };
                let splashed: Vec<CombatantId> = ctx
                    .state
                    .team_members(defender.team)
                    .filter(|c| c.id != defender.id && c.is_active())
                    .filter(|c| c.position.is_some_and(|p| p.is_adjacent(center)))
                    .map(|c| c.id)
                    .collect();
                out.extend(splashed.into_iter().map(|target| HookCommand::Splash {
                    target,
                    amount: *amount,
                }));
            }
            Self::Knockback { distance } => {
                if ctx.fate != Fate::Survived {
                    return;
                }
                let (Some(from), Some(to)) = (attacker.position, defender.position) else {
                    return;
                };
                out.push(HookCommand::Displace {
                    target: defender.id,
                    dx: (to.x - from.x).signum(),
                    dy: (to.y - from.y).signum(),
                    distance: *distance,
                });
            }
            Self::RefundEnergy { amount } => out.push(HookCommand::RefundEnergy {
                team: attacker.team,
                amount: *amount,
            }),
            Self::HealSelf { amount } => out.push(HookCommand::Heal {
                target: attacker.id,
                amount: *amount,
            }),
        }
    }
}

/// One effect id and its data-driven behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub id: String,
    #[serde(default)]
    pub pre: Vec<PreBonusSpec>,
    #[serde(default)]
    pub post: Vec<PostEffectSpec>,
}

/// [`EffectHook`] backed by an [`EffectSpec`].
#[derive(Clone, Debug)]
pub struct CatalogHook {
    spec: EffectSpec,
}

impl CatalogHook {
    pub fn new(spec: EffectSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &EffectSpec {
        &self.spec
    }
}

impl EffectHook for CatalogHook {
    fn name(&self) -> &str {
        &self.spec.id
    }

    fn pre_attack(&self, ctx: &PreAttackContext<'_>) -> f64 {
        self.spec.pre.iter().map(|pre| pre.bonus(ctx)).sum()
    }

    fn post_attack(&self, ctx: &PostAttackContext<'_>) -> Vec<HookCommand> {
        let mut commands = Vec::new();
        for post in &self.spec.post {
            post.commands(ctx, &mut commands);
        }
        commands
    }
}

/// Effect specs keyed by id.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    specs: HashMap<String, EffectSpec>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a spec, returning the one it replaced.
    pub fn insert(&mut self, spec: EffectSpec) -> Option<EffectSpec> {
        self.specs.insert(spec.id.clone(), spec)
    }

    pub fn get(&self, id: &str) -> Option<&EffectSpec> {
        self.specs.get(id)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Wraps every spec in a [`CatalogHook`] registered under its id.
    pub fn into_registry(self) -> EffectRegistry {
        let mut registry = EffectRegistry::new();
        for (id, spec) in self.specs {
            registry.register(id, Arc::new(CatalogHook::new(spec)));
        }
        tracing::debug!(target: "content::catalog", hooks = registry.len(), "effect registry built");
        registry
    }
}

impl FromIterator<EffectSpec> for EffectCatalog {
    fn from_iter<I: IntoIterator<Item = EffectSpec>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for spec in iter {
            catalog.insert(spec);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{
        BattleState, Battlefield, CombatConfig, Combatant, DamageResult, Position, Role,
        StatBlock, StatusKind, Team, WeaponClass, WeaponContext,
    };

    fn unit(id: u32, team: Team, x: i32, y: i32) -> Combatant {
        let stats = StatBlock {
            health: 100,
            morale: 100,
            ..StatBlock::default()
        };
        Combatant::new(
            CombatantId(id),
            format!("unit-{id}"),
            Role::Vanguard,
            team,
            WeaponClass::Melee,
            stats,
            Position::new(x, y),
            &CombatConfig::default(),
        )
    }

    fn state() -> BattleState {
        let roster = vec![
            unit(1, Team::A, 1, 1),
            unit(10, Team::B, 2, 1),
            unit(11, Team::B, 3, 2),
            unit(12, Team::B, 5, 5),
        ];
        BattleState::new(roster, Battlefield::new(8, 8)).expect("valid deployment")
    }

    fn post(spec: &EffectSpec, state: &BattleState, fate: Fate) -> Vec<HookCommand> {
        let weapon = WeaponContext::melee(10);
        let damage = DamageResult::zero();
        let ctx = PostAttackContext {
            state,
            attacker: state.combatant(CombatantId(1)).expect("attacker"),
            defender: state.combatant(CombatantId(10)).expect("defender"),
            weapon: &weapon,
            damage: &damage,
            fate,
        };
        CatalogHook::new(spec.clone()).post_attack(&ctx)
    }

    #[test]
    fn pre_bonuses_sum_matching_entries() {
        let state = state();
        let spec = EffectSpec {
            id: "opener".into(),
            pre: vec![
                PreBonusSpec::Flat { bonus: 0.1 },
                PreBonusSpec::FirstAction { bonus: 0.2 },
                PreBonusSpec::DefenderBelowHealth {
                    threshold: 0.5,
                    bonus: 0.3,
                },
            ],
            post: Vec::new(),
        };
        let weapon = WeaponContext::melee(10);
        let ctx = PreAttackContext {
            attacker: state.combatant(CombatantId(1)).expect("attacker"),
            defender: state.combatant(CombatantId(10)).expect("defender"),
            weapon: &weapon,
            first_action: true,
        };

        let bonus = CatalogHook::new(spec).pre_attack(&ctx);
        assert!((bonus - 0.3).abs() < 1e-9);
    }

    #[test]
    fn splash_hits_only_adjacent_allies_of_the_defender() {
        let state = state();
        let spec = EffectSpec {
            id: "shrapnel".into(),
            pre: Vec::new(),
            post: vec![PostEffectSpec::Splash { amount: 4 }],
        };

        assert_eq!(
            post(&spec, &state, Fate::Survived),
            vec![HookCommand::Splash {
                target: CombatantId(11),
                amount: 4
            }]
        );
    }

    #[test]
    fn knockback_points_away_from_the_attacker_and_needs_a_survivor() {
        let state = state();
        let spec = EffectSpec {
            id: "ram".into(),
            pre: Vec::new(),
            post: vec![PostEffectSpec::Knockback { distance: 2 }],
        };

        assert_eq!(
            post(&spec, &state, Fate::Survived),
            vec![HookCommand::Displace {
                target: CombatantId(10),
                dx: 1,
                dy: 0,
                distance: 2
            }]
        );
        assert!(post(&spec, &state, Fate::Surrendered).is_empty());
    }

    #[test]
    fn applied_statuses_carry_the_attacker_as_source() {
        let state = state();
        let spec = EffectSpec {
            id: "serrated".into(),
            pre: Vec::new(),
            post: vec![
                PostEffectSpec::ApplyStatus {
                    target: EffectTarget::Defender,
                    effect: StatusEffect::bleed(3, 2),
                },
                PostEffectSpec::HealSelf { amount: 5 },
            ],
        };

        let commands = post(&spec, &state, Fate::Survived);
        assert_eq!(commands.len(), 2);
        let HookCommand::ApplyStatus { target, effect } = &commands[0] else {
            panic!("expected status, got {:?}", commands[0]);
        };
        assert_eq!(*target, CombatantId(10));
        assert_eq!(effect.kind, StatusKind::Bleed);
        assert_eq!(effect.source, Some(CombatantId(1)));
        assert_eq!(
            commands[1],
            HookCommand::Heal {
                target: CombatantId(1),
                amount: 5
            }
        );
    }

    #[test]
    fn registry_holds_one_hook_per_id() {
        let catalog: EffectCatalog = ["a", "b", "a"]
            .into_iter()
            .map(|id| EffectSpec {
                id: id.into(),
                pre: Vec::new(),
                post: Vec::new(),
            })
            .collect();
        assert_eq!(catalog.len(), 2);

        let registry = catalog.into_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(Some("a")).map(|h| h.name()), Some("a"));
        assert!(registry.resolve(Some("missing")).is_none());
    }
}
