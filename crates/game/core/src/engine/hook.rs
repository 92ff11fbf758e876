//! Weapon and relic effect hooks.
//!
//! Each weapon or relic names an effect id. The executor resolves the id in
//! an [`EffectRegistry`] and calls the hook before damage (to add a bonus)
//! and after damage (to queue follow-up commands). Hooks never mutate state
//! themselves; the executor applies the [`HookCommand`]s they return, in
//! order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::action::WeaponContext;
use crate::combat::DamageResult;
use crate::state::{BattleState, Combatant, CombatantId, StatusEffect, Team};

use super::Fate;

/// Read-only view handed to [`EffectHook::pre_attack`].
#[derive(Clone, Copy, Debug)]
pub struct PreAttackContext<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub weapon: &'a WeaponContext,
    /// The attacker qualifies for the first-action bonus.
    pub first_action: bool,
}

/// Read-only view handed to [`EffectHook::post_attack`], after surrender and
/// death were resolved.
#[derive(Clone, Copy, Debug)]
pub struct PostAttackContext<'a> {
    pub state: &'a BattleState,
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub weapon: &'a WeaponContext,
    pub damage: &'a DamageResult,
    pub fate: Fate,
}

/// Follow-up mutation requested by a post-attack hook.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HookCommand {
    ApplyStatus {
        target: CombatantId,
        effect: StatusEffect,
    },
    /// Direct health loss that skips mitigation.
    Splash { target: CombatantId, amount: u32 },
    Heal { target: CombatantId, amount: u32 },
    /// Push `target` up to `distance` tiles along (`dx`, `dy`), stopping at
    /// the first blocked tile.
    Displace {
        target: CombatantId,
        dx: i32,
        dy: i32,
        distance: u32,
    },
    RefundEnergy { team: Team, amount: u32 },
    RefundBuzz { target: CombatantId, amount: u32 },
}

/// Data-driven behavior attached to a weapon or relic.
pub trait EffectHook: Send + Sync {
    fn name(&self) -> &str;

    /// Additive bonus for pipeline stage 2, e.g. `0.10` for +10%.
    fn pre_attack(&self, _ctx: &PreAttackContext<'_>) -> f64 {
        0.0
    }

    fn post_attack(&self, _ctx: &PostAttackContext<'_>) -> Vec<HookCommand> {
        Vec::new()
    }
}

/// Maps effect ids to hooks. Unknown ids resolve to nothing.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    hooks: HashMap<String, Arc<dyn EffectHook>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook, returning the one it replaced.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        hook: Arc<dyn EffectHook>,
    ) -> Option<Arc<dyn EffectHook>> {
        self.hooks.insert(id.into(), hook)
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<String>, hook: Arc<dyn EffectHook>) -> Self {
        self.register(id, hook);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn EffectHook>> {
        self.hooks.get(id)
    }

    /// Looks up a weapon's hook, logging ids that have no mapping.
    pub fn resolve(&self, effect_id: Option<&str>) -> Option<&dyn EffectHook> {
        let id = effect_id?;
        let hook = self.hooks.get(id);
        if hook.is_none() {
            tracing::debug!(target: "core::hooks", effect_id = id, "no hook registered, skipping");
        }
        hook.map(|hook| hook.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.ids().collect();
        ids.sort_unstable();
        f.debug_struct("EffectRegistry").field("hooks", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(f64);

    impl EffectHook for Flat {
        fn name(&self) -> &str {
            "flat"
        }

        fn pre_attack(&self, _ctx: &PreAttackContext<'_>) -> f64 {
            self.0
        }
    }

    #[test]
    fn missing_ids_resolve_to_none() {
        let registry = EffectRegistry::new().with("spear", Arc::new(Flat(0.1)));
        assert!(registry.resolve(Some("spear")).is_some());
        assert!(registry.resolve(Some("unknown")).is_none());
        assert!(registry.resolve(None).is_none());
    }

    #[test]
    fn register_replaces_existing_hook() {
        let mut registry = EffectRegistry::new();
        assert!(registry.register("spear", Arc::new(Flat(0.1))).is_none());
        assert!(registry.register("spear", Arc::new(Flat(0.2))).is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(format!("{registry:?}"), r#"EffectRegistry { hooks: ["spear"] }"#);
    }
}
