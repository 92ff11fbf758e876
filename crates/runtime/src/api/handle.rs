//! Cloneable façade for issuing commands to the runtime.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! driving the battle or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{
    ActionOutcome, AttackIntent, BattleState, CombatantId, Team, TurnTransition,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a running battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Leave deployment and start round 1. Returns the team acting first.
    pub async fn start_battle(&self) -> Result<Team> {
        self.request(|reply| Command::StartBattle { reply }).await?
    }

    /// Resolve an attack for the acting team.
    ///
    /// Rejected intents come back as [`ActionOutcome::Invalid`], not as errors.
    pub async fn issue_action(&self, intent: AttackIntent) -> Result<ActionOutcome> {
        self.request(|reply| Command::IssueAction { intent, reply })
            .await
    }

    /// End `team`'s turn.
    pub async fn end_turn(&self, team: Team) -> Result<TurnTransition> {
        self.request(|reply| Command::EndTurn { team, reply }).await?
    }

    /// Exchange the tiles of two allies on the acting team.
    pub async fn swap(&self, first: CombatantId, second: CombatantId) -> Result<()> {
        self.request(|reply| Command::Swap {
            first,
            second,
            reply,
        })
        .await?
    }

    /// Restore health outside an attack. Returns the amount restored.
    pub async fn heal(&self, target: CombatantId, amount: u32) -> Result<u32> {
        self.request(|reply| Command::Heal {
            target,
            amount,
            reply,
        })
        .await?
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Every engine event (damage, statuses, resources, ...)
    /// - `Topic::Turn` - Round/turn transitions and auto-turn scheduling
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Stop the battle worker. Later commands fail with
    /// [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
