//! Combat resolution math.
//!
//! Pure functions that turn an attack into per-channel losses. Nothing here
//! mutates a combatant: charges owed by curses and marks are reported on the
//! [`DamageResult`] and settled by the executor.
//!
//! # Pipeline
//!
//! 1. base scaling (Power for melee, Aim for ranged)
//! 2. additive pre-attack bonuses, applied once
//! 3. channel split into health and morale
//! 4. cover
//! 5. curse
//! 6. grit damage reduction (health only)
//! 7. hull absorption (health only)
//! 8. focus-fire (morale only)

pub mod damage;
pub mod result;

pub use damage::{
    DamageContext, compute, grit_damage_reduction, hull_absorption, round_half_away, scaled_base,
};
pub use result::DamageResult;
