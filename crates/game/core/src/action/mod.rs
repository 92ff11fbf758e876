//! Action domain - intents issued from outside the engine.
//!
//! Intents are plain data. UI, AI, scripts and tests build them and hand them
//! to [`BattleEngine`](crate::engine::BattleEngine), which validates and
//! resolves them.
//!
//! - `combat`: attack intents and weapon contexts
//! - [`Action`]: every intent a host can queue, for hosts that serialize them

pub mod combat;

pub use combat::{AttackIntent, AttackStyle, WeaponContext};

use crate::state::{CombatantId, Team};

/// Any intent a host can submit for the acting team.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Attack(AttackIntent),
    /// Two allies exchange tiles.
    Swap { first: CombatantId, second: CombatantId },
    EndTurn { team: Team },
}

impl Action {
    pub fn attack(attacker: CombatantId, defender: CombatantId, weapon: WeaponContext) -> Self {
        Self::Attack(AttackIntent::new(attacker, defender, weapon))
    }
}
