//! The physical world: terrain, food, and scent fields

pub mod field;
pub mod generation;
pub mod terrain;

pub use field::FieldGrid;
pub use terrain::{PheromoneKind, TerrainCell};
