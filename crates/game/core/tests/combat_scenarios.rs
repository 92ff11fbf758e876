mod common;

use std::sync::Arc;

use common::{Battle, flat_config, stats, unit};
use tactics_core::{
    ActionOutcome, AttackIntent, BattleEvent, Battlefield, CombatantId, CombatantStatus,
    EffectHook, EffectRegistry, Fate, HookCommand, InvalidReason, Obstacle, ObstacleId, Position,
    PostAttackContext, PreAttackContext, StatKind, StatusEffect, StatusKind, Team, UnitFlags,
    WeaponClass::{Melee, Ranged},
    WeaponContext,
};

fn three_shooters() -> Vec<tactics_core::Combatant> {
    vec![
        unit(1, Team::A, Ranged, (0, 0), stats(100, 100)),
        unit(2, Team::A, Ranged, (0, 1), stats(100, 100)),
        unit(3, Team::A, Ranged, (0, 2), stats(100, 100)),
    ]
}

fn morale_damage(outcome: &ActionOutcome) -> u32 {
    outcome.hit().expect("attack landed").damage.morale_damage
}

#[test]
fn marked_bonus_applies_to_the_next_two_hits_only() {
    let mut roster = three_shooters();
    roster.push(unit(10, Team::B, Melee, (5, 0), stats(1000, 1000)));
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle
        .unit_mut(10)
        .effects
        .apply(StatusEffect::marked(0.15, 2, 3));
    battle.start();

    let first = battle.attack(1, 10, WeaponContext::ranged(100));
    assert_eq!(morale_damage(&first), 115);
    assert!(battle.unit(10).effects.has(StatusKind::Marked));

    let (second, events) = battle.run(|engine| {
        engine.issue_action(&AttackIntent::new(
            CombatantId(2),
            CombatantId(10),
            WeaponContext::ranged(100),
        ))
    });
    assert_eq!(morale_damage(&second), 115);
    assert!(!battle.unit(10).effects.has(StatusKind::Marked));
    assert!(events.contains(&BattleEvent::StatusExpired {
        target: CombatantId(10),
        kind: StatusKind::Marked,
    }));

    let third = battle.attack(3, 10, WeaponContext::ranged(100));
    assert_eq!(morale_damage(&third), 100);
}

#[test]
fn cover_reduces_damage_for_every_unit_next_to_a_hazard() {
    let mut roster = three_shooters();
    roster.push(unit(10, Team::B, Melee, (4, 4), stats(100, 100)));
    roster.push(unit(11, Team::B, Melee, (6, 5), stats(100, 100)));
    roster.push(unit(12, Team::B, Melee, (7, 5), stats(100, 100)));
    let field = Battlefield::new(8, 8).with_hazard(Position::new(5, 5));
    let mut battle = Battle::new(roster, field, flat_config());
    battle.start();

    let covered_a = battle.attack(1, 10, WeaponContext::ranged(40));
    let covered_b = battle.attack(2, 11, WeaponContext::ranged(40));
    let open = battle.attack(3, 12, WeaponContext::ranged(40));

    for covered in [&covered_a, &covered_b] {
        let damage = &covered.hit().expect("hit").damage;
        assert_eq!(damage.health_damage, 33);
        assert_eq!(damage.morale_damage, 30);
    }
    let damage = &open.hit().expect("hit").damage;
    assert_eq!(damage.health_damage, 44);
    assert_eq!(damage.morale_damage, 40);
}

#[test]
fn curse_clears_after_exactly_its_charge_count() {
    let mut roster = three_shooters();
    roster.push(unit(10, Team::B, Melee, (5, 0), stats(1000, 1000)));
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle
        .unit_mut(10)
        .effects
        .apply(StatusEffect::curse(2.0, 2));
    battle.start();

    assert_eq!(morale_damage(&battle.attack(1, 10, WeaponContext::ranged(50))), 100);
    assert_eq!(
        battle
            .unit(10)
            .effects
            .get(StatusKind::Curse)
            .and_then(|e| e.charges),
        Some(1)
    );

    assert_eq!(morale_damage(&battle.attack(2, 10, WeaponContext::ranged(50))), 100);
    assert!(!battle.unit(10).effects.has(StatusKind::Curse));

    assert_eq!(morale_damage(&battle.attack(3, 10, WeaponContext::ranged(50))), 50);
}

#[test]
fn surrender_triggers_once_and_removes_the_unit_from_play() {
    let roster = vec![
        unit(1, Team::A, Melee, (4, 0), stats(100, 100)),
        unit(2, Team::A, Ranged, (0, 0), stats(100, 100)),
        unit(10, Team::B, Melee, (5, 0), stats(1000, 100)),
        unit(11, Team::B, Melee, (7, 7), stats(100, 100)),
    ];
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle.start();

    // 70 * 1.25 = 87.5 -> 88 morale lost, 12% left
    let (outcome, events) = battle.run(|engine| {
        engine.issue_action(&AttackIntent::new(
            CombatantId(1),
            CombatantId(10),
            WeaponContext::melee(70),
        ))
    });
    assert_eq!(outcome.hit().expect("hit").fate, Fate::Surrendered);
    assert_eq!(battle.unit(10).status, CombatantStatus::Surrendered);
    assert!(battle.unit(10).position.is_some());
    let surrenders = events
        .iter()
        .filter(|e| matches!(e, BattleEvent::Surrendered { .. }))
        .count();
    assert_eq!(surrenders, 1);

    let again = battle.attack(2, 10, WeaponContext::ranged(10));
    assert_eq!(
        again,
        ActionOutcome::Invalid(InvalidReason::TargetDown(CombatantId(10)))
    );
    assert!(battle.state.is_active());
}

#[test]
fn destroying_the_last_enemy_ends_the_battle() {
    let roster = vec![
        unit(1, Team::A, Ranged, (0, 0), stats(100, 100)),
        unit(2, Team::A, Ranged, (0, 1), stats(100, 100)),
        unit(10, Team::B, Melee, (5, 0), stats(30, 1000)),
    ];
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle.start();

    let (outcome, events) = battle.run(|engine| {
        engine.issue_action(&AttackIntent::new(
            CombatantId(1),
            CombatantId(10),
            WeaponContext::ranged(50),
        ))
    });
    let report = outcome.hit().expect("hit");
    assert_eq!(report.fate, Fate::Destroyed);
    assert_eq!(battle.unit(10).vitals.health, 0);
    assert_eq!(battle.unit(10).position, None);
    assert!(events.contains(&BattleEvent::Died {
        target: CombatantId(10)
    }));
    assert_eq!(
        events.last(),
        Some(&BattleEvent::BattleEnded {
            winner: Some(Team::A)
        })
    );
    assert_eq!(battle.state.winner(), Some(Team::A));
    assert_eq!(battle.state.turn.auto_turn.pending, None);

    let late = battle.attack(2, 10, WeaponContext::ranged(50));
    assert_eq!(late, ActionOutcome::Invalid(InvalidReason::BattleOver));
}

#[test]
fn captain_death_ends_the_battle_early() {
    let roster = vec![
        unit(1, Team::A, Ranged, (0, 0), stats(100, 100)),
        unit(10, Team::B, Melee, (5, 0), stats(10, 100)).as_captain(),
        unit(11, Team::B, Melee, (7, 7), stats(100, 100)),
    ];
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle.start();

    battle.attack(1, 10, WeaponContext::ranged(20));
    assert!(!battle.state.is_active());
    assert_eq!(battle.state.winner(), Some(Team::A));
    assert!(battle.unit(11).is_active());
}

#[test]
fn invalid_intents_leave_state_untouched() {
    let roster = vec![
        unit(1, Team::A, Melee, (0, 0), stats(100, 100)),
        unit(2, Team::A, Ranged, (0, 1), stats(100, 100)),
        unit(3, Team::A, Ranged, (0, 2), stats(100, 100)),
        unit(10, Team::B, Melee, (5, 0), stats(100, 100)),
    ];
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle.start();
    battle.unit_mut(2).effects.apply(StatusEffect::stun(1));
    let before = battle.state.clone();

    let cases = [
        (
            AttackIntent::new(CombatantId(1), CombatantId(10), WeaponContext::melee(10)),
            InvalidReason::OutOfRange {
                distance: 5,
                range: 1,
            },
        ),
        (
            AttackIntent::new(CombatantId(3), CombatantId(1), WeaponContext::ranged(10)),
            InvalidReason::FriendlyTarget(CombatantId(1)),
        ),
        (
            AttackIntent::untargeted(CombatantId(3), WeaponContext::ranged(10)),
            InvalidReason::NoTarget,
        ),
        (
            AttackIntent::new(CombatantId(3), CombatantId(99), WeaponContext::ranged(10)),
            InvalidReason::UnknownCombatant(CombatantId(99)),
        ),
        (
            AttackIntent::new(CombatantId(10), CombatantId(1), WeaponContext::melee(10)),
            InvalidReason::NotYourTurn {
                attacker: CombatantId(10),
                team: Team::B,
                acting: Team::A,
            },
        ),
        (
            AttackIntent::new(
                CombatantId(3),
                CombatantId(10),
                WeaponContext::ranged(10).with_energy_cost(10),
            ),
            InvalidReason::InsufficientEnergy {
                required: 10,
                available: 6,
            },
        ),
        (
            AttackIntent::new(CombatantId(2), CombatantId(10), WeaponContext::ranged(10)),
            InvalidReason::Stunned(CombatantId(2)),
        ),
        (
            AttackIntent::new(
                CombatantId(3),
                CombatantId(10),
                WeaponContext::ranged(10).with_range(3),
            ),
            InvalidReason::OutOfRange {
                distance: 5,
                range: 3,
            },
        ),
    ];

    for (intent, expected) in cases {
        let outcome = battle.engine().issue_action(&intent);
        assert_eq!(outcome, ActionOutcome::Invalid(expected));
    }
    assert_eq!(battle.state, before);

    assert!(!battle.attack(3, 10, WeaponContext::ranged(10)).is_invalid());
    assert_eq!(
        battle.attack(3, 10, WeaponContext::ranged(10)),
        ActionOutcome::Invalid(InvalidReason::AlreadyActed(CombatantId(3)))
    );
}

#[test]
fn obstacle_in_the_shared_row_absorbs_the_attack() {
    let roster = vec![
        unit(1, Team::A, Ranged, (0, 0), stats(100, 100)),
        unit(2, Team::A, Ranged, (1, 0), stats(100, 100)),
        unit(10, Team::B, Melee, (4, 0), stats(100, 100)),
    ];
    let field = Battlefield::new(8, 8).with_obstacle(Obstacle {
        id: ObstacleId(1),
        position: Position::new(2, 0),
        durability: 10,
    });
    let mut battle = Battle::new(roster, field, flat_config());
    battle.start();

    let blocked = battle.attack(1, 10, WeaponContext::ranged(30));
    assert_eq!(
        blocked,
        ActionOutcome::Blocked {
            obstacle: ObstacleId(1),
            damage: 10,
            destroyed: true,
        }
    );
    assert_eq!(battle.unit(10).vitals.health, 100);
    assert!(battle.unit(1).flags.contains(UnitFlags::HAS_ACTED));
    assert_eq!(battle.state.turn.team(Team::A).energy, 4);

    let through = battle.attack(2, 10, WeaponContext::ranged(30));
    assert_eq!(through.hit().expect("line is clear").damage.health_damage, 33);
}

#[test]
fn miss_chance_spends_the_action_without_touching_the_target() {
    let mut roster = three_shooters();
    roster.push(unit(10, Team::B, Melee, (5, 0), stats(100, 100)));
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle
        .unit_mut(1)
        .effects
        .apply(StatusEffect::timed(StatusKind::MissChance, 2, 50.0));
    battle.start();

    let missed = battle.attack(1, 10, WeaponContext::ranged(40).with_hit_roll(10));
    assert_eq!(missed, ActionOutcome::Missed);
    assert_eq!(battle.unit(10).vitals.health, 100);
    assert!(battle.unit(1).flags.contains(UnitFlags::HAS_ACTED));
    assert_eq!(battle.state.turn.team(Team::A).energy, 4);

    let landed = battle.attack(2, 10, WeaponContext::ranged(40).with_hit_roll(10));
    assert!(landed.hit().is_some());
}

#[test]
fn zero_damage_attack_only_updates_bookkeeping() {
    let mut roster = three_shooters();
    roster.push(unit(10, Team::B, Melee, (5, 0), stats(100, 100)));
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle
        .unit_mut(10)
        .effects
        .apply(StatusEffect::curse(2.0, 1));
    battle.start();
    let defender_before = battle.unit(10).clone();

    let outcome = battle.attack(1, 10, WeaponContext::ranged(0));
    let report = outcome.hit().expect("zero-damage hit");
    assert!(report.damage.is_zero());
    assert_eq!(report.fate, Fate::Survived);

    let defender = battle.unit(10);
    assert_eq!(defender.vitals, defender_before.vitals);
    assert_eq!(defender.effects, defender_before.effects);
    assert!(battle.unit(1).flags.contains(UnitFlags::HAS_ACTED));
    assert_eq!(battle.state.turn.team(Team::A).combo, 1);
}

fn focus_fire_battle() -> Battle {
    let roster = vec![
        unit(1, Team::A, Ranged, (0, 0), stats(100, 100)),
        unit(2, Team::A, Ranged, (0, 1), stats(100, 100)),
        unit(10, Team::B, Melee, (5, 0), stats(1000, 1000)),
        unit(11, Team::B, Melee, (5, 5), stats(1000, 1000)),
    ];
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle.start();
    battle
}

/// Ends the current A turn and plays on until A acts again.
fn next_a_turn(battle: &mut Battle) {
    battle.engine().end_turn(Team::A).expect("A ends");
    battle.advance_to(Team::A);
}

#[test]
fn focus_fire_escalates_across_consecutive_hits_from_one_attacker() {
    let mut battle = focus_fire_battle();

    let mut dealt = Vec::new();
    for round in 1..=5 {
        assert_eq!(battle.state.turn.round, round);
        dealt.push(morale_damage(&battle.attack(1, 10, WeaponContext::ranged(100))));
        assert_eq!(
            battle.attack(1, 10, WeaponContext::ranged(100)),
            ActionOutcome::Invalid(InvalidReason::AlreadyActed(CombatantId(1)))
        );
        next_a_turn(&mut battle);
    }

    assert_eq!(dealt, vec![100, 115, 130, 150, 150]);
    assert_eq!(battle.unit(10).last_attacker, Some(CombatantId(1)));
    assert_eq!(battle.unit(10).focus_fire_stacks, 5);
}

#[test]
fn focus_fire_streak_breaks_on_another_attacker() {
    let mut battle = focus_fire_battle();

    battle.attack(1, 10, WeaponContext::ranged(100));
    next_a_turn(&mut battle);
    assert_eq!(morale_damage(&battle.attack(1, 10, WeaponContext::ranged(100))), 115);

    // A fresh attacker starts its own streak and ends unit 1's.
    assert_eq!(morale_damage(&battle.attack(2, 10, WeaponContext::ranged(100))), 100);
    assert_eq!(battle.unit(10).last_attacker, Some(CombatantId(2)));

    next_a_turn(&mut battle);
    assert_eq!(morale_damage(&battle.attack(1, 10, WeaponContext::ranged(100))), 100);
}

#[test]
fn focus_fire_streak_breaks_when_the_attacker_switches_targets() {
    let mut battle = focus_fire_battle();

    battle.attack(1, 10, WeaponContext::ranged(100));
    next_a_turn(&mut battle);
    assert_eq!(morale_damage(&battle.attack(1, 11, WeaponContext::ranged(100))), 100);
    assert_eq!(battle.unit(10).focus_fire_stacks, 0);
    assert_eq!(battle.unit(10).last_attacker, None);

    next_a_turn(&mut battle);
    assert_eq!(morale_damage(&battle.attack(1, 10, WeaponContext::ranged(100))), 100);
}

struct Shockwave;

impl EffectHook for Shockwave {
    fn name(&self) -> &str {
        "shockwave"
    }

    fn pre_attack(&self, _ctx: &PreAttackContext<'_>) -> f64 {
        0.5
    }

    fn post_attack(&self, ctx: &PostAttackContext<'_>) -> Vec<HookCommand> {
        let (Some(from), Some(to)) = (ctx.attacker.position, ctx.defender.position) else {
            return Vec::new();
        };
        vec![
            HookCommand::ApplyStatus {
                target: ctx.defender.id,
                effect: StatusEffect::bleed(5, 2),
            },
            HookCommand::Displace {
                target: ctx.defender.id,
                dx: to.x - from.x,
                dy: to.y - from.y,
                distance: 2,
            },
            HookCommand::RefundEnergy {
                team: ctx.attacker.team,
                amount: 2,
            },
        ]
    }
}

fn shockwave_battle() -> Battle {
    let roster = vec![
        unit(1, Team::A, Melee, (1, 0), stats(100, 100)),
        unit(10, Team::B, Melee, (2, 0), stats(100, 100)),
    ];
    let effects = EffectRegistry::new().with("shockwave", Arc::new(Shockwave));
    Battle::new(roster, Battlefield::new(8, 8), flat_config()).with_effects(effects)
}

#[test]
fn hooks_add_a_bonus_and_queue_follow_up_commands() {
    let mut battle = shockwave_battle();
    battle.start();

    let (outcome, events) = battle.run(|engine| {
        engine.issue_action(&AttackIntent::new(
            CombatantId(1),
            CombatantId(10),
            WeaponContext::melee(20).with_effect("shockwave"),
        ))
    });
    let damage = &outcome.hit().expect("hit").damage;
    // 20 * 1.5 = 30; morale 30 * 1.25 = 37.5 -> 38
    assert_eq!(damage.health_damage, 30);
    assert_eq!(damage.morale_damage, 38);

    let defender = battle.unit(10);
    assert!(defender.effects.has(StatusKind::Bleed));
    assert_eq!(defender.position, Some(Position::new(4, 0)));
    assert_eq!(battle.state.turn.team(Team::A).energy, 6);
    assert!(events.contains(&BattleEvent::Displaced {
        target: CombatantId(10),
        from: Position::new(2, 0),
        to: Position::new(4, 0),
    }));
}

#[test]
fn knockback_immunity_and_unknown_effects_are_tolerated() {
    let mut battle = shockwave_battle();
    battle
        .unit_mut(10)
        .effects
        .apply(StatusEffect::timed(StatusKind::KnockbackImmune, 2, 0.0));
    battle.start();

    battle.attack(1, 10, WeaponContext::melee(20).with_effect("shockwave"));
    assert_eq!(battle.unit(10).position, Some(Position::new(2, 0)));

    battle.engine().end_turn(Team::A).expect("A ends");
    battle.advance_to(Team::A);

    let plain = battle.attack(1, 10, WeaponContext::melee(20).with_effect("no-such-relic"));
    assert_eq!(plain.hit().expect("hit").damage.health_damage, 20);
}

#[test]
fn attacker_power_scales_melee_damage() {
    let roster = vec![
        unit(
            1,
            Team::A,
            Melee,
            (4, 0),
            stats(100, 100).with(StatKind::Power, 30),
        ),
        unit(
            10,
            Team::B,
            Melee,
            (5, 0),
            stats(100, 100).with(StatKind::Grit, 20),
        ),
    ];
    let mut battle = Battle::new(roster, Battlefield::new(8, 8), flat_config());
    battle.start();

    let outcome = battle.attack(1, 10, WeaponContext::melee(60));
    assert_eq!(outcome.hit().expect("hit").damage.health_damage, 90);
    assert_eq!(battle.unit(10).vitals.health, 10);
}
