//! Battlefield geometry the combat engine needs: hazards that grant cover and
//! obstacles that block lines of fire. Layout and pathfinding live elsewhere.

use super::{ObstacleId, Position};

/// A destructible obstacle occupying one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Position,
    pub durability: u32,
}

/// Result of striking an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleHit {
    pub obstacle: ObstacleId,
    pub damage: u32,
    pub destroyed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battlefield {
    pub width: u32,
    pub height: u32,
    hazards: Vec<Position>,
    obstacles: Vec<Obstacle>,
}

impl Battlefield {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hazards: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hazard(mut self, position: Position) -> Self {
        self.add_hazard(position);
        self
    }

    #[must_use]
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn add_hazard(&mut self, position: Position) {
        if !self.hazards.contains(&position) {
            self.hazards.push(position);
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    pub fn is_hazard(&self, position: Position) -> bool {
        self.hazards.contains(&position)
    }

    /// A tile next to (or on) a hazard grants cover.
    pub fn in_cover(&self, position: Position) -> bool {
        self.hazards
            .iter()
            .any(|hazard| hazard.chebyshev(position) <= 1)
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacle_at(&self, position: Position) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.position == position)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Nearest obstacle strictly between two tiles sharing a row or column.
    ///
    /// Tiles that share neither have no blocking line.
    pub fn obstacle_between(&self, from: Position, to: Position) -> Option<ObstacleId> {
        let same_row = from.y == to.y;
        let same_column = from.x == to.x;
        if !(same_row || same_column) {
            return None;
        }

        self.obstacles
            .iter()
            .filter(|o| {
                let p = o.position;
                if same_row {
                    p.y == from.y && strictly_between(p.x, from.x, to.x)
                } else {
                    p.x == from.x && strictly_between(p.y, from.y, to.y)
                }
            })
            .min_by_key(|o| (o.position.chebyshev(from), o.id))
            .map(|o| o.id)
    }

    /// Damages an obstacle, removing it once durability reaches zero.
    pub fn damage_obstacle(&mut self, id: ObstacleId, damage: u32) -> Option<ObstacleHit> {
        let obstacle = self.obstacles.iter_mut().find(|o| o.id == id)?;
        let dealt = damage.min(obstacle.durability);
        obstacle.durability -= dealt;
        let destroyed = obstacle.durability == 0;
        if destroyed {
            self.obstacles.retain(|o| o.id != id);
        }
        Some(ObstacleHit {
            obstacle: id,
            damage: dealt,
            destroyed,
        })
    }
}

fn strictly_between(value: i32, a: i32, b: i32) -> bool {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    value > low && value < high
}
