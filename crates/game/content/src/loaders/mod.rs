//! Content loaders for reading battle data from files.
//!
//! Every loader returns [`LoadResult`] with the offending path in the error
//! context, so a bad data directory reports which file broke.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod field;
pub mod roster;

pub use catalog::CatalogLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use field::FieldLoader;
pub use roster::{RosterLoader, UnitSpec};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
