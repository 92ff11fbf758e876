//! Async host for a single battle.
//!
//! This crate wires the pure `tactics-core` engine into a tokio task that owns
//! the battle state, serializes every mutation through one command channel,
//! and resolves the non-interactive team's turns after the configured delay.
//! Consumers spawn a [`BattleRuntime`] and drive it through [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps the battle task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{ActionProvider, BattleHandle, PassProvider, Result, RuntimeError};
pub use events::{Event, EventBus, Topic, TurnEvent};
pub use runtime::{BattleRuntime, RuntimeBuilder, RuntimeConfig};
