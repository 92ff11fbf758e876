//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use tactics_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`CombatConfig::default`] value,
    /// so a file only lists what it tunes.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        tracing::debug!(
            target: "content::loaders",
            interactive = ?config.interactive_team,
            "combat config loaded"
        );
        Ok(config)
    }
}
