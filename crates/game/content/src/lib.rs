//! Data-driven content definitions and loaders.
//!
//! This crate houses battle content and provides loaders for RON/TOML data files:
//! - Weapon and relic effects (data-driven hooks via RON)
//! - Rosters (data-driven via RON)
//! - Battlefields (hazards and obstacles via RON)
//! - Combat configuration (data-driven via TOML)
//!
//! Content is consumed by hosts before a battle starts; the engine only sees
//! the resulting [`tactics_core::EffectRegistry`], roster and config.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{CatalogHook, EffectCatalog, EffectSpec, EffectTarget, PostEffectSpec, PreBonusSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, FieldLoader, RosterLoader, UnitSpec,
};
