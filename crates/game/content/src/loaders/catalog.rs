//! Effect catalog loader.

use std::path::Path;

use anyhow::{Context, bail};

use crate::catalog::{EffectCatalog, EffectSpec};
use crate::loaders::{LoadResult, read_file};

/// Loader for weapon and relic effects from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load an effect catalog from a RON file.
    ///
    /// RON format: `Vec<EffectSpec>`. Duplicate ids are rejected rather than
    /// silently shadowed.
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        let specs: Vec<EffectSpec> = ron::from_str(&content)
            .with_context(|| format!("Failed to parse effect catalog RON at {}", path.display()))?;

        let mut catalog = EffectCatalog::new();
        for spec in specs {
            let id = spec.id.clone();
            if catalog.insert(spec).is_some() {
                bail!("Duplicate effect id '{}' in {}", id, path.display());
            }
        }

        tracing::debug!(
            target: "content::loaders",
            path = %path.display(),
            effects = catalog.len(),
            "effect catalog loaded"
        );
        Ok(catalog)
    }
}
