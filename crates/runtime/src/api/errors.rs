//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and refused turn commands so
//! clients can bubble them up with consistent context. Invalid attacks are not
//! errors; they come back as `ActionOutcome::Invalid`.

use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{GameError, HealError, SwapError, Team, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires an initial battle state before building")]
    MissingState,

    #[error("{team} action provider failed: {reason}")]
    ProviderFailed { team: Team, reason: String },

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error(transparent)]
    Heal(#[from] HealError),
}

impl RuntimeError {
    /// Stable code for refused game commands, `None` for plumbing failures.
    pub fn game_error_code(&self) -> Option<&'static str> {
        match self {
            Self::Turn(err) => Some(err.error_code()),
            Self::Swap(err) => Some(err.error_code()),
            Self::Heal(err) => Some(err.error_code()),
            _ => None,
        }
    }
}
