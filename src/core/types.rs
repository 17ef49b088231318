//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for ants
///
/// Ids are handed out monotonically by the colony and never reused, so a
/// stale id simply fails to resolve once its ant has died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AntId(pub u32);

impl std::fmt::Display for AntId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation tick counter (frame number)
pub type Tick = u64;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance in cells
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// One-cell step toward `target`: the sign of the delta on each axis
    pub fn step_toward(&self, target: &Self) -> Self {
        Self {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ant_id_equality() {
        assert_eq!(AntId(3), AntId(3));
        assert_ne!(AntId(3), AntId(4));
    }

    #[test]
    fn test_distance() {
        let a = GridPos::new(0, 0);
        let b = GridPos::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert_eq!(a.chebyshev(&b), 4);
    }

    #[test]
    fn test_step_toward_uses_sign_not_distance() {
        let from = GridPos::new(5, 5);
        assert_eq!(from.step_toward(&GridPos::new(20, 5)), GridPos::new(6, 5));
        assert_eq!(from.step_toward(&GridPos::new(0, 0)), GridPos::new(4, 4));
        assert_eq!(from.step_toward(&from), from);
    }

    #[test]
    fn test_display_matches_memory_format() {
        assert_eq!(GridPos::new(7, -2).to_string(), "7,-2");
    }
}
