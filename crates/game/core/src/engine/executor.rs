//! Attack resolution.
//!
//! One intent runs strictly in this order:
//!
//! 1. validate attacker, resources and target (re-checked every call, so a
//!    stale defender reference is caught here)
//! 2. miss roll
//! 3. row/column blocking by obstacles
//! 4. pre-attack hook
//! 5. damage calculator
//! 6. apply damage, settle curse/mark charges and focus fire
//! 7. surrender check, then death check
//! 8. post-attack hook commands
//! 9. attacker bookkeeping (acted flag, energy, combo, buzz decay)

use tracing::{debug, info};

use crate::action::{AttackIntent, AttackStyle};
use crate::combat::{self, DamageContext, DamageResult};
use crate::state::{CombatantId, CombatantStatus, Position, StatusKind, Team, UnitFlags};

use super::BattleEngine;
use super::events::{BattleEvent, Resource};
use super::hook::{HookCommand, PostAttackContext, PreAttackContext};
use super::outcome::{ActionOutcome, Fate, HitReport, InvalidReason};

/// Validated facts about an intent, captured before any mutation.
#[derive(Clone, Copy, Debug)]
struct AttackPlan {
    team: Team,
    attacker: CombatantId,
    defender: CombatantId,
    attacker_position: Position,
    defender_position: Position,
    energy_cost: u32,
}

impl<'a> BattleEngine<'a> {
    /// Executes one attack intent.
    ///
    /// Invalid intents are reported as [`ActionOutcome::Invalid`] and leave
    /// the state untouched.
    pub fn issue_action(&mut self, intent: &AttackIntent) -> ActionOutcome {
        let plan = match self.validate_attack(intent) {
            Ok(plan) => plan,
            Err(reason) => {
                debug!(
                    target: "core::executor",
                    attacker = %intent.attacker,
                    %reason,
                    "intent rejected"
                );
                return ActionOutcome::Invalid(reason);
            }
        };

        let outcome = self.resolve_attack(intent, plan);
        self.check_battle_end();
        outcome
    }

    fn validate_attack(&self, intent: &AttackIntent) -> Result<AttackPlan, InvalidReason> {
        if !self.state.is_active() {
            return Err(InvalidReason::BattleOver);
        }
        let acting = self
            .state
            .turn
            .acting_team()
            .ok_or(InvalidReason::NoActingTeam)?;

        let attacker = self
            .state
            .combatant(intent.attacker)
            .ok_or(InvalidReason::UnknownCombatant(intent.attacker))?;
        if attacker.team != acting {
            return Err(InvalidReason::NotYourTurn {
                attacker: attacker.id,
                team: attacker.team,
                acting,
            });
        }
        let Some(attacker_position) = attacker.position.filter(|_| attacker.is_active()) else {
            return Err(InvalidReason::AttackerUnavailable {
                id: attacker.id,
                status: attacker.status,
            });
        };
        if attacker.effects.is_stunned() {
            return Err(InvalidReason::Stunned(attacker.id));
        }
        if attacker.flags.contains(UnitFlags::HAS_ACTED) {
            return Err(InvalidReason::AlreadyActed(attacker.id));
        }

        let energy_cost = intent
            .weapon
            .energy_cost
            .unwrap_or(self.env.config.attack_energy_cost);
        let available = self.state.turn.team(acting).energy;
        if energy_cost > available {
            return Err(InvalidReason::InsufficientEnergy {
                required: energy_cost,
                available,
            });
        }

        let defender_id = intent.defender.ok_or(InvalidReason::NoTarget)?;
        let defender = self
            .state
            .combatant(defender_id)
            .ok_or(InvalidReason::UnknownCombatant(defender_id))?;
        if defender.team == attacker.team {
            return Err(InvalidReason::FriendlyTarget(defender_id));
        }
        let Some(defender_position) = defender.position.filter(|_| defender.is_active()) else {
            return Err(InvalidReason::TargetDown(defender_id));
        };

        let distance = attacker_position.chebyshev(defender_position);
        let range = match intent.weapon.style {
            AttackStyle::Melee => Some(1),
            AttackStyle::Ranged => intent.weapon.range,
        };
        if let Some(range) = range
            && distance > range
        {
            return Err(InvalidReason::OutOfRange { distance, range });
        }

        Ok(AttackPlan {
            team: acting,
            attacker: attacker.id,
            defender: defender_id,
            attacker_position,
            defender_position,
            energy_cost,
        })
    }

    fn resolve_attack(&mut self, intent: &AttackIntent, plan: AttackPlan) -> ActionOutcome {
        let config = self.env.config;
        let effects = self.env.effects;
        let weapon = &intent.weapon;

        let Some(miss_chance) = self
            .state
            .combatant(plan.attacker)
            .map(|attacker| attacker.effects.miss_chance())
        else {
            return ActionOutcome::Invalid(InvalidReason::UnknownCombatant(plan.attacker));
        };

        if let Some(roll) = weapon.hit_roll
            && roll < miss_chance
        {
            debug!(target: "core::executor", attacker = %plan.attacker, roll, "attack missed");
            self.emit(BattleEvent::Missed {
                attacker: plan.attacker,
                defender: plan.defender,
            });
            self.finish_attack(&plan, false);
            return ActionOutcome::Missed;
        }

        if let Some(obstacle) = self
            .state
            .battlefield
            .obstacle_between(plan.attacker_position, plan.defender_position)
        {
            let damage = self.state.combatant(plan.attacker).map_or(0, |attacker| {
                combat::scaled_base(weapon.base_damage, weapon.style, attacker, config)
            });
            if let Some(hit) = self.state.battlefield.damage_obstacle(obstacle, damage) {
                debug!(
                    target: "core::executor",
                    attacker = %plan.attacker,
                    %obstacle,
                    damage = hit.damage,
                    destroyed = hit.destroyed,
                    "attack blocked"
                );
                self.emit(BattleEvent::ObstacleHit {
                    obstacle: hit.obstacle,
                    damage: hit.damage,
                    destroyed: hit.destroyed,
                });
                self.finish_attack(&plan, false);
                return ActionOutcome::Blocked {
                    obstacle: hit.obstacle,
                    damage: hit.damage,
                    destroyed: hit.destroyed,
                };
            }
        }

        let (Some(attacker), Some(defender)) = (
            self.state.combatant(plan.attacker),
            self.state.combatant(plan.defender),
        ) else {
            return ActionOutcome::Invalid(InvalidReason::UnknownCombatant(plan.defender));
        };
        let hook = effects.resolve(weapon.effect_id.as_deref());
        let first_action = attacker.flags.contains(UnitFlags::FIRST_ACTION)
            && self.state.turn.holds_initiative(plan.team);

        let pre_attack_bonus = hook.map_or(0.0, |hook| {
            hook.pre_attack(&PreAttackContext {
                attacker,
                defender,
                weapon,
                first_action,
            })
        });
        let focus_fire_count = if defender.last_attacker == Some(plan.attacker) {
            defender.focus_fire_stacks
        } else {
            0
        };
        let ctx = DamageContext {
            pre_attack_bonus,
            first_action,
            combo_count: self.state.turn.team(plan.team).combo,
            focus_fire_count,
            in_cover: self.state.battlefield.in_cover(plan.defender_position),
        };

        let damage = combat::compute(
            weapon.base_damage,
            weapon.style,
            attacker,
            defender,
            &ctx,
            config,
        );

        self.apply_damage(&plan, &damage);
        let fate = self.settle_fate(plan.defender);

        if let Some(hook) = hook {
            let commands = match (
                self.state.combatant(plan.attacker),
                self.state.combatant(plan.defender),
            ) {
                (Some(attacker), Some(defender)) => hook.post_attack(&PostAttackContext {
                    state: self.state,
                    attacker,
                    defender,
                    weapon,
                    damage: &damage,
                    fate,
                }),
                _ => Vec::new(),
            };
            for command in commands {
                self.apply_command(command, plan.attacker);
            }
        }

        self.finish_attack(&plan, true);

        info!(
            target: "core::executor",
            attacker = %plan.attacker,
            defender = %plan.defender,
            health = damage.health_damage,
            morale = damage.morale_damage,
            hull = damage.hull_absorbed,
            %fate,
            "attack resolved"
        );

        ActionOutcome::Hit(HitReport {
            attacker: plan.attacker,
            defender: plan.defender,
            damage,
            fate,
        })
    }

    fn apply_damage(&mut self, plan: &AttackPlan, damage: &DamageResult) {
        // Hitting someone else ends the attacker's streak on earlier targets.
        for other in &mut self.state.roster {
            if other.id != plan.defender && other.last_attacker == Some(plan.attacker) {
                other.clear_focus_fire();
            }
        }

        let Some(defender) = self.state.combatant_mut(plan.defender) else {
            return;
        };

        defender.drain_hull(damage.hull_absorbed);
        let health_lost = defender.lose_health(damage.health_damage);
        let morale_lost = defender.lose_morale(damage.morale_damage);

        let mut expired = Vec::new();
        if damage.curse_consumed && defender.effects.consume_charge(StatusKind::Curse) {
            expired.push(StatusKind::Curse);
        }
        if damage.mark_consumed && defender.effects.consume_charge(StatusKind::Marked) {
            expired.push(StatusKind::Marked);
        }

        defender.record_hit_from(plan.attacker);

        if health_lost > 0 || damage.hull_absorbed > 0 {
            self.emit(BattleEvent::Damaged {
                target: plan.defender,
                amount: health_lost,
                hull_absorbed: damage.hull_absorbed,
                source: Some(plan.attacker),
            });
        }
        if morale_lost > 0 {
            self.emit(BattleEvent::MoraleDamaged {
                target: plan.defender,
                amount: morale_lost,
                source: Some(plan.attacker),
            });
        }
        for kind in expired {
            self.emit(BattleEvent::StatusExpired {
                target: plan.defender,
                kind,
            });
        }
    }

    /// Surrender check, then death check, on current pools.
    ///
    /// Surrender happens at most once: only active units are checked.
    pub(super) fn settle_fate(&mut self, id: CombatantId) -> Fate {
        let threshold = self.env.config.surrender_threshold;
        let Some(unit) = self.state.combatant_mut(id) else {
            return Fate::Survived;
        };

        let surrendered =
            unit.is_active() && unit.stats.morale > 0 && unit.morale_fraction() < threshold;
        if surrendered {
            unit.status = CombatantStatus::Surrendered;
        }

        let destroyed = unit.vitals.health == 0 && !unit.is_destroyed();
        if destroyed {
            unit.status = CombatantStatus::Destroyed;
            unit.position = None;
        }
        let status = unit.status;

        if surrendered {
            info!(target: "core::executor", unit = %id, "unit surrendered");
            self.emit(BattleEvent::Surrendered { target: id });
        }
        if destroyed {
            info!(target: "core::executor", unit = %id, "unit destroyed");
            self.emit(BattleEvent::Died { target: id });
        }

        match status {
            CombatantStatus::Active => Fate::Survived,
            CombatantStatus::Surrendered => Fate::Surrendered,
            CombatantStatus::Destroyed => Fate::Destroyed,
        }
    }

    fn apply_command(&mut self, command: HookCommand, source: CombatantId) {
        match command {
            HookCommand::ApplyStatus { target, effect } => {
                let Some(unit) = self.state.combatant_mut(target).filter(|c| c.is_active())
                else {
                    return;
                };
                let kind = effect.kind;
                if unit.effects.apply(effect.with_source(source)) {
                    self.emit(BattleEvent::StatusApplied { target, kind });
                } else {
                    debug!(target: "core::executor", unit = %target, %kind, "status dropped");
                }
            }
            HookCommand::Splash { target, amount } => {
                let Some(unit) = self.state.combatant_mut(target).filter(|c| c.is_active())
                else {
                    return;
                };
                let lost = unit.lose_health(amount);
                if lost > 0 {
                    self.emit(BattleEvent::Damaged {
                        target,
                        amount: lost,
                        hull_absorbed: 0,
                        source: Some(source),
                    });
                }
                self.settle_fate(target);
            }
            HookCommand::Heal { target, amount } => {
                self.restore_health(target, amount);
            }
            HookCommand::Displace {
                target,
                dx,
                dy,
                distance,
            } => self.displace(target, dx, dy, distance),
            HookCommand::RefundEnergy { team, amount } => {
                let state = self.state.turn.team_mut(team);
                state.energy = state.energy.saturating_add(amount);
                let value = state.energy;
                self.emit(BattleEvent::ResourceChanged {
                    team,
                    resource: Resource::Energy,
                    value,
                });
            }
            HookCommand::RefundBuzz { target, amount } => {
                let Some(unit) = self.state.combatant_mut(target) else {
                    return;
                };
                if unit.restore_buzz(amount) > 0 {
                    let value = unit.vitals.buzz;
                    self.emit(BattleEvent::BuzzChanged { target, value });
                }
            }
        }
    }

    /// Health restored, or 0 while heal-blocked.
    pub(super) fn restore_health(&mut self, target: CombatantId, amount: u32) -> u32 {
        let Some(unit) = self.state.combatant_mut(target).filter(|c| c.is_active()) else {
            return 0;
        };
        if unit.effects.is_heal_blocked() {
            debug!(target: "core::executor", unit = %target, "heal blocked");
            return 0;
        }
        let restored = unit.restore_health(amount);
        if restored > 0 {
            self.emit(BattleEvent::Healed {
                target,
                amount: restored,
            });
        }
        restored
    }

    /// Knockback: steps one tile at a time until the path is blocked.
    fn displace(&mut self, target: CombatantId, dx: i32, dy: i32, distance: u32) {
        let (dx, dy) = (dx.signum(), dy.signum());
        let Some(unit) = self.state.combatant(target) else {
            return;
        };
        if (dx, dy) == (0, 0)
            || !unit.is_active()
            || !unit.effects.can_be_knocked_back()
            || unit.effects.is_trapped()
        {
            return;
        }
        let Some(from) = unit.position else {
            return;
        };

        let mut to = from;
        for _ in 0..distance {
            let next = to.offset(dx, dy);
            if !self.state.is_free(next) {
                break;
            }
            to = next;
        }
        if to == from {
            return;
        }

        if let Some(unit) = self.state.combatant_mut(target) {
            unit.position = Some(to);
        }
        self.emit(BattleEvent::Displaced { target, from, to });
    }

    fn finish_attack(&mut self, plan: &AttackPlan, landed: bool) {
        let decay = self.env.config.buzz_decay_per_action;
        let mut buzz = None;
        if let Some(attacker) = self.state.combatant_mut(plan.attacker) {
            attacker.flags.insert(UnitFlags::HAS_ACTED);
            attacker.flags.remove(UnitFlags::FIRST_ACTION);
            if decay > 0 && attacker.vitals.buzz > 0 {
                attacker.vitals.buzz = attacker.vitals.buzz.saturating_sub(decay);
                buzz = Some(attacker.vitals.buzz);
            }
        }

        let team = self.state.turn.team_mut(plan.team);
        team.energy = team.energy.saturating_sub(plan.energy_cost);
        if landed {
            team.combo += 1;
        }
        let energy = team.energy;

        if let Some(value) = buzz {
            self.emit(BattleEvent::BuzzChanged {
                target: plan.attacker,
                value,
            });
        }
        self.emit(BattleEvent::ResourceChanged {
            team: plan.team,
            resource: Resource::Energy,
            value: energy,
        });
    }
}
