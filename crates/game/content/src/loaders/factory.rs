//! Content factory for building a battle from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tactics_core::{BattleState, Battlefield, CombatConfig, Combatant, EffectRegistry};

use crate::catalog::EffectCatalog;
use crate::loaders::{CatalogLoader, ConfigLoader, FieldLoader, LoadResult, RosterLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── rosters/
/// │   └── skirmish.ron
/// └── fields/
///     └── skirmish.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the effect catalog from `effects.ron`.
    pub fn load_catalog(&self) -> LoadResult<EffectCatalog> {
        CatalogLoader::load(&self.data_dir.join("effects.ron"))
    }

    /// Load `effects.ron` straight into an engine registry.
    pub fn load_registry(&self) -> LoadResult<EffectRegistry> {
        Ok(self.load_catalog()?.into_registry())
    }

    /// Load a roster from `rosters/{name}.ron`.
    pub fn load_roster(&self, name: &str, config: &CombatConfig) -> LoadResult<Vec<Combatant>> {
        let path = self.data_dir.join("rosters").join(format!("{name}.ron"));
        RosterLoader::load(&path, config)
    }

    /// Load a battlefield from `fields/{name}.ron`.
    pub fn load_field(&self, name: &str) -> LoadResult<Battlefield> {
        let path = self.data_dir.join("fields").join(format!("{name}.ron"));
        FieldLoader::load(&path)
    }

    /// Load the roster and field sharing `name` and validate the deployment.
    pub fn load_battle(&self, name: &str, config: &CombatConfig) -> LoadResult<BattleState> {
        let roster = self.load_roster(name, config)?;
        let field = self.load_field(name)?;
        BattleState::new(roster, field).with_context(|| format!("Invalid deployment '{name}'"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
