pub mod battlefield;
pub mod combatant;
pub mod common;
pub mod status;
pub mod turn;

// Re-export battlefield types
pub use battlefield::{Battlefield, Obstacle, ObstacleHit};

// Re-export combatant types
pub use combatant::{Combatant, CombatantStatus, Role, UnitFlags, Vitals, WeaponClass};

// Re-export common types
pub use common::{CombatantId, ObstacleId, Position, Team};

// Re-export status effects
pub use status::{
    Channel, StackPolicy, StatusEffect, StatusEffects, StatusKind, StatusPolicy, TickPhase,
    TickReport,
};

// Re-export turn state
pub use turn::{AutoTurnTimer, TeamState, TurnPhase, TurnState};
