//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the battle.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tactics_core::{BattleState, CombatConfig, EffectRegistry};

use crate::api::{ActionProvider, BattleHandle, PassProvider, Result, RuntimeError};
use crate::events::EventBus;
use crate::workers::BattleWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that hosts one battle
///
/// Design: Runtime owns the worker task and coordinates shutdown.
/// [`BattleHandle`] provides a cloneable façade for clients.
pub struct BattleRuntime {
    handle: BattleHandle,
    worker_handle: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Spawns a worker for `state` and returns a handle to it.
    ///
    /// The worker runs until [`BattleHandle::shutdown`] or until every handle
    /// is dropped. Must be called inside a tokio runtime.
    pub fn spawn(
        state: BattleState,
        config: CombatConfig,
        effects: EffectRegistry,
        provider: impl ActionProvider + 'static,
    ) -> BattleHandle {
        let (handle, _worker) = Self::launch(
            state,
            RuntimeConfig {
                combat: config,
                ..RuntimeConfig::default()
            },
            effects,
            Arc::new(provider),
        );
        handle
    }

    fn launch(
        state: BattleState,
        config: RuntimeConfig,
        effects: EffectRegistry,
        provider: Arc<dyn ActionProvider>,
    ) -> (BattleHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let worker = BattleWorker::new(
            state,
            config.combat,
            effects,
            provider,
            command_rx,
            event_bus.clone(),
        );
        let worker_handle = tokio::spawn(worker.run());

        tracing::debug!(target: "runtime::worker", "battle worker spawned");
        (BattleHandle::new(command_tx, event_bus), worker_handle)
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully and wait for the worker to exit
    pub async fn shutdown(self) -> Result<()> {
        // A worker that already stopped is not an error here.
        let _ = self.handle.shutdown().await;
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<BattleState>,
    effects: EffectRegistry,
    provider: Option<Arc<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            effects: EffectRegistry::new(),
            provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the combat tunables
    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.config.combat = combat;
        self
    }

    /// Provide initial battle state
    pub fn initial_state(mut self, state: BattleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the weapon and relic effect registry (empty by default)
    pub fn effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    /// Set the provider for auto-resolved turns (defaults to [`PassProvider`])
    pub fn provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<BattleRuntime> {
        let state = self.state.ok_or(RuntimeError::MissingState)?;
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(PassProvider) as Arc<dyn ActionProvider>);

        let (handle, worker_handle) =
            BattleRuntime::launch(state, self.config, self.effects, provider);
        Ok(BattleRuntime {
            handle,
            worker_handle,
        })
    }
}
