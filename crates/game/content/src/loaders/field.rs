//! Battlefield loader.
//!
//! Loads hazards and obstacles from RON files. Unit placement comes from the
//! roster.

use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use tactics_core::{Battlefield, Obstacle, ObstacleId, Position};

use crate::loaders::{LoadResult, read_file};

/// Battlefield structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldRon {
    dimensions: (u32, u32),
    #[serde(default)]
    hazards: Vec<(i32, i32)>,
    /// (id, x, y, durability)
    #[serde(default)]
    obstacles: Vec<(u32, i32, i32, u32)>,
}

/// Loader for battlefields from RON files.
pub struct FieldLoader;

impl FieldLoader {
    pub fn load(path: &Path) -> LoadResult<Battlefield> {
        let content = read_file(path)?;
        let data: FieldRon = ron::from_str(&content)
            .with_context(|| format!("Failed to parse battlefield RON at {}", path.display()))?;

        let mut field = Battlefield::new(data.dimensions.0, data.dimensions.1);
        for (x, y) in data.hazards {
            let position = Position::new(x, y);
            ensure!(field.contains(position), "hazard {position:?} is off the field");
            field.add_hazard(position);
        }
        for (id, x, y, durability) in data.obstacles {
            let position = Position::new(x, y);
            ensure!(field.contains(position), "obstacle {id} at {position:?} is off the field");
            ensure!(
                field.obstacle_at(position).is_none(),
                "two obstacles share {position:?}"
            );
            field = field.with_obstacle(Obstacle {
                id: ObstacleId(id),
                position,
                durability,
            });
        }

        Ok(field)
    }
}
