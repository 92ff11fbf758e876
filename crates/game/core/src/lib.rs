//! Deterministic turn-based tactics combat rules.
//!
//! `tactics-core` defines the canonical rules (stat blocks, status effects,
//! the damage pipeline, attack execution and turn control) as pure,
//! synchronous APIs. All state mutation flows through
//! [`engine::BattleEngine`]; hosts supply dice rolls and clock readings, so
//! the same inputs always produce the same battle.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod stats;

pub use action::{Action, AttackIntent, AttackStyle, WeaponContext};
pub use combat::{DamageContext, DamageResult};
pub use config::CombatConfig;
pub use engine::{
    ActionOutcome, BattleEngine, BattleEnv, BattleEvent, EffectHook, EffectRegistry, Fate,
    HealError, HitReport, HookCommand, InvalidReason, PostAttackContext, PreAttackContext,
    Resource, SwapError, TurnError, TurnTransition,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    AutoTurnTimer, BattleState, BattleStatus, Battlefield, Channel, Combatant, CombatantId,
    CombatantStatus, InitializationError, Obstacle, ObstacleHit, ObstacleId, Position, Role,
    StackPolicy, StatusEffect, StatusEffects, StatusKind, StatusPolicy, Team, TeamState,
    TickPhase, TickReport, TurnPhase, TurnState, UnitFlags, Vitals, WeaponClass,
};
pub use stats::{NegativeStat, StatBlock, StatKind, StatTier, StatTiers};
