//! Terrain classes for grid cells

use serde::{Deserialize, Serialize};

/// What a cell is made of
///
/// The only transition is `Soil -> Tunnel`, by digging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainCell {
    /// Open surface, walkable
    Air,
    /// Solid ground, diggable but not walkable
    #[default]
    Soil,
    /// Dug-out ground, walkable and counts as home
    Tunnel,
}

impl TerrainCell {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, TerrainCell::Soil)
    }
}

/// Which scent field a deposit or query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PheromoneKind {
    /// Trail toward food
    Food,
    /// Trail toward the nest
    Home,
}
