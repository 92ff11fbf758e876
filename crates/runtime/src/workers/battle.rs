//! Battle worker that owns the authoritative [`tactics_core::BattleState`].
//!
//! Receives commands from [`BattleHandle`](crate::BattleHandle), runs them
//! through [`BattleEngine`], publishes the recorded events, and resolves the
//! non-interactive team's turn once its auto-turn deadline passes.

use std::sync::Arc;
use std::time::Duration;

use tactics_core::{
    Action, ActionOutcome, AttackIntent, BattleEngine, BattleEnv, BattleState, CombatConfig,
    CombatantId, EffectRegistry, Team, TurnTransition,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::api::{ActionProvider, Result};
use crate::events::{Event, EventBus, TurnEvent};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Leave deployment and start round 1.
    StartBattle { reply: oneshot::Sender<Result<Team>> },
    /// Resolve an attack for the acting team.
    IssueAction {
        intent: AttackIntent,
        reply: oneshot::Sender<ActionOutcome>,
    },
    EndTurn {
        team: Team,
        reply: oneshot::Sender<Result<TurnTransition>>,
    },
    Swap {
        first: CombatantId,
        second: CombatantId,
        reply: oneshot::Sender<Result<()>>,
    },
    Heal {
        target: CombatantId,
        amount: u32,
        reply: oneshot::Sender<Result<u32>>,
    },
    /// Query the current battle state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
    /// Stop accepting commands and exit the loop.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    state: BattleState,
    config: CombatConfig,
    effects: EffectRegistry,
    provider: Arc<dyn ActionProvider>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    /// Zero point of the logical millisecond clock handed to the engine.
    epoch: Instant,
    /// Armed auto-turn deadline, if any.
    deadline: Option<Instant>,
}

impl BattleWorker {
    /// Creates a new battle worker.
    pub fn new(
        state: BattleState,
        config: CombatConfig,
        effects: EffectRegistry,
        provider: Arc<dyn ActionProvider>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state,
            config,
            effects,
            provider,
            command_rx,
            event_bus,
            epoch: Instant::now(),
            deadline: None,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown { reply }) => {
                        self.command_rx.close();
                        let _ = reply.send(());
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                () = wait_for(deadline) => self.run_auto_turn().await,
            }
            self.sync_auto_turn();
        }
        debug!(target: "runtime::worker", "battle worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::StartBattle { reply } => {
                let result = self.with_engine(|engine| engine.start_battle());
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::IssueAction { intent, reply } => {
                let outcome = self.execute_attack(&intent);
                let _ = reply.send(outcome);
            }
            Command::EndTurn { team, reply } => {
                let result = self.with_engine(|engine| engine.end_turn(team));
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Swap {
                first,
                second,
                reply,
            } => {
                let result = self.with_engine(|engine| engine.swap(first, second));
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Heal {
                target,
                amount,
                reply,
            } => {
                let result = self.with_engine(|engine| engine.heal(target, amount));
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    /// Runs `f` against a fresh engine and publishes what it recorded.
    fn with_engine<R>(&mut self, f: impl FnOnce(&mut BattleEngine<'_>) -> R) -> R {
        let env = BattleEnv::new(&self.config, &self.effects);
        let mut engine = BattleEngine::new(&mut self.state, env);
        let result = f(&mut engine);
        for event in engine.take_events() {
            self.event_bus.publish_battle(event);
        }
        result
    }

    fn execute_attack(&mut self, intent: &AttackIntent) -> ActionOutcome {
        let outcome = self.with_engine(|engine| engine.issue_action(intent));
        if let ActionOutcome::Invalid(reason) = &outcome {
            debug!(
                target: "runtime::worker",
                attacker = %intent.attacker,
                %reason,
                "attack rejected"
            );
        }
        outcome
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Mirrors the engine's auto-turn request onto a tokio deadline.
    ///
    /// A fresh request is armed at the current clock; a cancelled request or
    /// an ended battle clears the deadline.
    fn sync_auto_turn(&mut self) {
        let timer = self.state.turn.auto_turn;
        let Some(team) = timer.pending.filter(|_| self.state.is_active()) else {
            if self.deadline.take().is_some() {
                debug!(target: "runtime::worker", "auto-turn cancelled");
            }
            return;
        };
        if timer.deadline_ms.is_some() && self.deadline.is_some() {
            return;
        }

        let now_ms = self.now_ms();
        let deadline_ms = match timer.deadline_ms {
            Some(deadline_ms) => Some(deadline_ms),
            None => self.with_engine(|engine| engine.arm_auto_turn(now_ms)),
        };
        let Some(deadline_ms) = deadline_ms else {
            return;
        };

        self.deadline = Some(self.epoch + Duration::from_millis(deadline_ms));
        debug!(target: "runtime::worker", %team, deadline_ms, "auto-turn scheduled");
        self.event_bus
            .publish(Event::Turn(TurnEvent::AutoTurnScheduled { team, deadline_ms }));
    }

    async fn run_auto_turn(&mut self) {
        self.deadline = None;
        let now_ms = self.now_ms();
        let due = self.with_engine(|engine| engine.auto_turn_due(now_ms));
        let Some(team) = due else {
            self.state.turn.auto_turn.cancel();
            return;
        };

        let snapshot = self.state.clone();
        let actions = match self.provider.provide_actions(team, &snapshot).await {
            Ok(actions) => actions,
            Err(error) => {
                warn!(target: "runtime::worker", %team, %error, "action provider failed, passing turn");
                Vec::new()
            }
        };

        let submitted = actions.len();
        for action in actions {
            if !self.state.is_active() || self.state.turn.acting_team() != Some(team) {
                break;
            }
            match action {
                Action::Attack(intent) => {
                    self.execute_attack(&intent);
                }
                Action::Swap { first, second } => {
                    if let Err(error) = self.with_engine(|engine| engine.swap(first, second)) {
                        debug!(target: "runtime::worker", %team, %error, "auto swap refused");
                    }
                }
                Action::EndTurn { .. } => break,
            }
        }

        if self.state.is_active() && self.state.turn.acting_team() == Some(team) {
            if let Err(error) = self.with_engine(|engine| engine.end_turn(team)) {
                warn!(target: "runtime::worker", %team, %error, "auto end turn refused");
            }
        }

        info!(target: "runtime::worker", %team, actions = submitted, "auto-turn resolved");
        self.event_bus.publish(Event::Turn(TurnEvent::AutoTurnResolved {
            team,
            actions: submitted,
        }));
    }
}

/// Sleeps until `deadline`, or forever without one.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
