#![allow(dead_code)]

use tactics_core::{
    ActionOutcome, AttackIntent, BattleEngine, BattleEnv, BattleEvent, BattleState, Battlefield,
    CombatConfig, Combatant, CombatantId, EffectRegistry, Position, Role, StatBlock, StatKind,
    Team, WeaponClass, WeaponContext,
};

pub fn stats(health: u32, morale: u32) -> StatBlock {
    StatBlock::default()
        .with(StatKind::Health, health)
        .with(StatKind::Morale, morale)
}

pub fn unit(
    id: u32,
    team: Team,
    weapon: WeaponClass,
    at: (i32, i32),
    stats: StatBlock,
) -> Combatant {
    Combatant::new(
        CombatantId(id),
        format!("unit-{id}"),
        Role::Striker,
        team,
        weapon,
        stats,
        Position::new(at.0, at.1),
        &CombatConfig::default(),
    )
}

/// Defaults without first-action and combo bonuses, so damage numbers only
/// reflect the stage under test.
pub fn flat_config() -> CombatConfig {
    CombatConfig {
        first_action_bonus: 0.0,
        combo_step_bonus: 0.0,
        ..CombatConfig::default()
    }
}

pub struct Battle {
    pub state: BattleState,
    pub config: CombatConfig,
    pub effects: EffectRegistry,
}

impl Battle {
    pub fn new(roster: Vec<Combatant>, field: Battlefield, config: CombatConfig) -> Self {
        Self {
            state: BattleState::new(roster, field).expect("valid deployment"),
            config,
            effects: EffectRegistry::new(),
        }
    }

    pub fn with_effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    pub fn engine(&mut self) -> BattleEngine<'_> {
        BattleEngine::new(&mut self.state, BattleEnv::new(&self.config, &self.effects))
    }

    /// Runs `f` against a fresh engine and returns its result with the
    /// events it recorded.
    pub fn run<R>(&mut self, f: impl FnOnce(&mut BattleEngine<'_>) -> R) -> (R, Vec<BattleEvent>) {
        let mut engine = self.engine();
        let result = f(&mut engine);
        let events = engine.take_events();
        (result, events)
    }

    pub fn start(&mut self) -> Team {
        self.engine().start_battle().expect("battle starts")
    }

    pub fn attack(&mut self, attacker: u32, defender: u32, weapon: WeaponContext) -> ActionOutcome {
        let intent = AttackIntent::new(CombatantId(attacker), CombatantId(defender), weapon);
        self.engine().issue_action(&intent)
    }

    /// Ends turns until `team` is acting.
    pub fn advance_to(&mut self, team: Team) {
        while self.state.turn.acting_team() != Some(team) {
            let acting = self.state.turn.acting_team().expect("battle in progress");
            self.engine().end_turn(acting).expect("turn ends");
        }
    }

    pub fn unit(&self, id: u32) -> &Combatant {
        self.state
            .combatant(CombatantId(id))
            .expect("combatant in roster")
    }

    pub fn unit_mut(&mut self, id: u32) -> &mut Combatant {
        self.state
            .combatant_mut(CombatantId(id))
            .expect("combatant in roster")
    }
}
