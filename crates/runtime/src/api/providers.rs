//! Asynchronous abstraction for sourcing the auto-resolved team's intents.
//!
//! Runtime users plug in [`ActionProvider`] implementations so the
//! non-interactive team can be driven by scripts, fixtures, or AI policies.
use async_trait::async_trait;
use tactics_core::{Action, BattleState, Team};

use super::errors::Result;

/// Trait for providing a team's actions when its turn auto-resolves.
///
/// The runtime executes the returned actions in order, stopping at the first
/// [`Action::EndTurn`] or once the battle ends, and then ends the turn if the
/// team is still acting.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide the actions `team` takes this turn.
    ///
    /// # Arguments
    /// * `team` - The team whose turn is auto-resolving
    /// * `state` - Read-only snapshot of the battle at the deadline
    async fn provide_actions(&self, team: Team, state: &BattleState) -> Result<Vec<Action>>;
}

/// Provider that passes every turn.
pub struct PassProvider;

#[async_trait]
impl ActionProvider for PassProvider {
    async fn provide_actions(&self, _team: Team, _state: &BattleState) -> Result<Vec<Action>> {
        Ok(Vec::new())
    }
}
