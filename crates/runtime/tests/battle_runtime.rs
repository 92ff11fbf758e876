use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tactics_content::CatalogLoader;
use tactics_core::{
    Action, AttackIntent, BattleEvent, BattleState, BattleStatus, Battlefield, CombatConfig,
    Combatant, CombatantId, EffectRegistry, Position, Role, StatBlock, SwapError, Team,
    TurnError, TurnTransition, Vitals, WeaponClass, WeaponContext,
};
use tactics_runtime::{
    ActionProvider, BattleRuntime, Event, PassProvider, RuntimeError, Topic, TurnEvent,
};
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn unit(id: u32, team: Team, at: (i32, i32), health: u32, speed: u32) -> Combatant {
    let stats = StatBlock {
        health,
        morale: 100,
        speed,
        ..StatBlock::default()
    };
    Combatant::new(
        CombatantId(id),
        format!("unit-{id}"),
        Role::Striker,
        team,
        WeaponClass::Melee,
        stats,
        Position::new(at.0, at.1),
        &CombatConfig::default(),
    )
}

/// Team A (faster, interactive) at the origin facing one Team B unit.
fn skirmish(a_health: u32) -> BattleState {
    let roster = vec![
        unit(1, Team::A, (0, 0), a_health, 10),
        unit(10, Team::B, (1, 0), 100, 5),
    ];
    BattleState::new(roster, Battlefield::new(6, 6)).expect("valid deployment")
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Counts calls and answers each with the same script.
struct Scripted {
    calls: Arc<AtomicUsize>,
    script: Vec<Action>,
}

#[async_trait]
impl ActionProvider for Scripted {
    async fn provide_actions(
        &self,
        _team: Team,
        _state: &BattleState,
    ) -> tactics_runtime::Result<Vec<Action>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.script.clone())
    }
}

#[tokio::test]
async fn attacks_publish_battle_events() {
    init_tracing();
    let handle = BattleRuntime::spawn(
        skirmish(100),
        CombatConfig::default(),
        EffectRegistry::new(),
        PassProvider,
    );
    let mut battle_rx = handle.subscribe(Topic::Battle);

    assert_eq!(handle.start_battle().await.expect("start"), Team::A);
    let outcome = handle
        .issue_action(AttackIntent::new(
            CombatantId(1),
            CombatantId(10),
            WeaponContext::melee(10),
        ))
        .await
        .expect("worker replies");
    let report = outcome.hit().expect("attack lands").clone();

    let state = handle.query_state().await.expect("state");
    let defender = state.combatant(CombatantId(10)).expect("defender");
    assert_eq!(defender.vitals.health, 100 - report.damage.health_damage);

    let events = drain(&mut battle_rx);
    assert!(matches!(
        events.first(),
        Some(Event::Battle(BattleEvent::RoundStarted { round: 1, first: Team::A }))
    ));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Battle(BattleEvent::Damaged { target: CombatantId(10), .. })
    )));
}

#[tokio::test(start_paused = true)]
async fn auto_turn_resolves_after_the_configured_delay() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = BattleRuntime::spawn(
        skirmish(100),
        CombatConfig::default(),
        EffectRegistry::new(),
        Scripted {
            calls: Arc::clone(&calls),
            script: Vec::new(),
        },
    );
    let mut turn_rx = handle.subscribe(Topic::Turn);

    handle.start_battle().await.expect("start");
    assert_eq!(
        handle.end_turn(Team::A).await.expect("A ends"),
        TurnTransition::NextTurn { team: Team::B }
    );

    sleep(Duration::from_millis(749)).await;
    let state = handle.query_state().await.expect("state");
    assert_eq!(state.turn.acting_team(), Some(Team::B));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    sleep(Duration::from_millis(2)).await;
    let state = handle.query_state().await.expect("state");
    assert_eq!(state.turn.round, 2);
    assert_eq!(state.turn.acting_team(), Some(Team::A));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let events = drain(&mut turn_rx);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Turn(TurnEvent::AutoTurnScheduled { team: Team::B, .. })
    )));
    assert!(events.contains(&Event::Turn(TurnEvent::AutoTurnResolved {
        team: Team::B,
        actions: 0
    })));
}

#[tokio::test(start_paused = true)]
async fn manual_end_turn_cancels_the_pending_auto_turn() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = BattleRuntime::spawn(
        skirmish(100),
        CombatConfig::default(),
        EffectRegistry::new(),
        Scripted {
            calls: Arc::clone(&calls),
            script: Vec::new(),
        },
    );

    handle.start_battle().await.expect("start");
    handle.end_turn(Team::A).await.expect("A ends");
    handle.end_turn(Team::B).await.expect("B ends before the deadline");

    sleep(Duration::from_secs(2)).await;
    let state = handle.query_state().await.expect("state");
    assert_eq!(state.turn.round, 2);
    assert_eq!(state.turn.acting_team(), Some(Team::A));
    assert_eq!(state.turn.auto_turn.pending, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn provider_actions_can_end_the_battle() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = BattleRuntime::spawn(
        skirmish(10),
        CombatConfig::default(),
        EffectRegistry::new(),
        Scripted {
            calls: Arc::clone(&calls),
            script: vec![
                Action::attack(CombatantId(10), CombatantId(1), WeaponContext::melee(50)),
                Action::EndTurn { team: Team::B },
            ],
        },
    );
    let mut turn_rx = handle.subscribe(Topic::Turn);

    handle.start_battle().await.expect("start");
    handle.end_turn(Team::A).await.expect("A ends");
    sleep(Duration::from_secs(5)).await;

    let state = handle.query_state().await.expect("state");
    assert_eq!(
        state.status,
        BattleStatus::Ended {
            winner: Some(Team::B)
        }
    );
    assert_eq!(state.turn.auto_turn.pending, None);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let events = drain(&mut turn_rx);
    assert!(events.contains(&Event::Turn(TurnEvent::Transition(
        BattleEvent::BattleEnded {
            winner: Some(Team::B)
        }
    ))));
    let scheduled = events
        .iter()
        .filter(|event| matches!(event, Event::Turn(TurnEvent::AutoTurnScheduled { .. })))
        .count();
    assert_eq!(scheduled, 1);
}

#[tokio::test]
async fn refused_commands_surface_typed_errors() {
    init_tracing();
    let handle = BattleRuntime::spawn(
        skirmish(100),
        CombatConfig::default(),
        EffectRegistry::new(),
        PassProvider,
    );

    let err = handle.end_turn(Team::A).await.expect_err("not started");
    assert!(matches!(err, RuntimeError::Turn(TurnError::NotStarted)));

    handle.start_battle().await.expect("start");
    let err = handle.end_turn(Team::B).await.expect_err("not B's turn");
    assert_eq!(err.game_error_code(), Some("TURN_NOT_YOUR_TURN"));

    let err = handle
        .swap(CombatantId(1), CombatantId(1))
        .await
        .expect_err("same unit");
    assert!(matches!(err, RuntimeError::Swap(SwapError::SameCombatant)));

    handle.shutdown().await.expect("shutdown");
    assert!(matches!(
        handle.query_state().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test]
async fn builder_runs_content_defined_effects() {
    init_tracing();
    assert!(matches!(
        BattleRuntime::builder().build(),
        Err(RuntimeError::MissingState)
    ));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("effects.ron");
    fs::write(&path, r#"[(id: "leech", post: [HealSelf(amount: 5)])]"#).expect("write catalog");
    let registry = CatalogLoader::load(&path).expect("catalog").into_registry();

    let mut state = skirmish(100);
    let wounded = state.roster[0].clone().with_vitals(Vitals {
        health: 50,
        morale: 100,
        buzz: 0,
        hull: 0,
    });
    state.roster[0] = wounded;

    let runtime = BattleRuntime::builder()
        .initial_state(state)
        .effects(registry)
        .build()
        .expect("runtime");
    let handle = runtime.handle();

    handle.start_battle().await.expect("start");
    let outcome = handle
        .issue_action(AttackIntent::new(
            CombatantId(1),
            CombatantId(10),
            WeaponContext::melee(10).with_effect("leech"),
        ))
        .await
        .expect("worker replies");
    assert!(outcome.hit().is_some());

    let state = handle.query_state().await.expect("state");
    let attacker = state.combatant(CombatantId(1)).expect("attacker");
    assert_eq!(attacker.vitals.health, 55);

    runtime.shutdown().await.expect("clean shutdown");
}
