//! Attack execution and turn control.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`].
//! Attack intents flow through [`BattleEngine::issue_action`]; turn
//! bookkeeping (`start_battle`, `end_turn`, `swap`, `heal`) lives in
//! `turns`. Configuration and the effect registry are injected through
//! [`BattleEnv`]; nothing is looked up globally.

mod errors;
mod events;
mod executor;
mod hook;
mod outcome;
mod turns;

pub use errors::{HealError, SwapError, TurnError};
pub use events::{BattleEvent, Resource};
pub use hook::{EffectHook, EffectRegistry, HookCommand, PostAttackContext, PreAttackContext};
pub use outcome::{ActionOutcome, Fate, HitReport, InvalidReason};
pub use turns::TurnTransition;

use crate::config::CombatConfig;
use crate::state::{BattleState, BattleStatus, Team, TurnPhase};

/// Collaborators the engine reads but never owns.
#[derive(Clone, Copy, Debug)]
pub struct BattleEnv<'a> {
    pub config: &'a CombatConfig,
    pub effects: &'a EffectRegistry,
}

impl<'a> BattleEnv<'a> {
    pub fn new(config: &'a CombatConfig, effects: &'a EffectRegistry) -> Self {
        Self { config, effects }
    }
}

/// Battle engine that executes attacks and advances turns.
///
/// Borrowing the state mutably for the engine's lifetime makes it the single
/// writer; hosts construct one per command and drain [`take_events`]
/// afterwards.
///
/// [`take_events`]: BattleEngine::take_events
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    env: BattleEnv<'a>,
    events: Vec<BattleEvent>,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, env: BattleEnv<'a>) -> Self {
        Self {
            state,
            env,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn config(&self) -> &CombatConfig {
        self.env.config
    }

    /// Drains events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: BattleEvent) {
        tracing::trace!(target: "core::events", ?event);
        self.events.push(event);
    }

    /// Stops the battle. Later intents resolve to `Invalid(BattleOver)`.
    fn end_battle(&mut self, winner: Option<Team>) {
        if !self.state.is_active() {
            return;
        }
        self.state.status = BattleStatus::Ended { winner };
        self.state.turn.phase = TurnPhase::Finished;
        self.state.turn.auto_turn.cancel();
        tracing::info!(target: "core::turns", ?winner, round = self.state.turn.round, "battle ended");
        self.emit(BattleEvent::BattleEnded { winner });
    }

    /// Ends the battle if a team was eliminated or lost its captain.
    ///
    /// Returns true when the battle is over.
    fn check_battle_end(&mut self) -> bool {
        if !self.state.is_active() {
            return true;
        }

        let defeated = |team: Team| {
            let captain_down = self
                .state
                .team_members(team)
                .any(|c| c.is_captain() && c.is_destroyed());
            captain_down || self.state.active_count(team) == 0
        };
        let a_down = defeated(Team::A);
        let b_down = defeated(Team::B);

        let winner = match (a_down, b_down) {
            (false, false) => return false,
            (true, true) => None,
            (true, false) => Some(Team::B),
            (false, true) => Some(Team::A),
        };
        self.end_battle(winner);
        true
    }
}
