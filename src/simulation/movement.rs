//! Single-step greedy movement

use crate::entity::ant::Ant;
use crate::world::field::FieldGrid;

/// Step one cell toward the ant's target
///
/// Each axis moves by the sign of its delta. The step is taken only if the
/// destination can be entered; otherwise the stuck counter grows. Returns
/// whether the ant moved.
pub fn move_toward_target(ant: &mut Ant, grid: &FieldGrid) -> bool {
    let Some(target) = ant.target else {
        return false;
    };

    let next = ant.position.step_toward(&target);
    if next == ant.position {
        ant.stuck_counter = 0;
        return false;
    }

    if grid.can_enter(next.x, next.y) {
        ant.relocate(next);
        ant.stuck_counter = 0;
        true
    } else {
        ant.stuck_counter += 1;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{AntId, GridPos};
    use crate::world::terrain::TerrainCell;

    fn grid() -> FieldGrid {
        let mut grid = FieldGrid::new(10, 10, 100.0);
        for x in 0..10 {
            for y in 0..5 {
                grid.set_terrain(x, y, TerrainCell::Air);
            }
        }
        grid
    }

    #[test]
    fn test_diagonal_step() {
        let grid = grid();
        let mut ant = Ant::new(AntId(0), GridPos::new(1, 1), &SimulationConfig::default());
        ant.target = Some(GridPos::new(8, 4));
        assert!(move_toward_target(&mut ant, &grid));
        assert_eq!(ant.position, GridPos::new(2, 2));
        assert_eq!(ant.previous_position, GridPos::new(1, 1));
    }

    #[test]
    fn test_blocked_step_counts_as_stuck() {
        let grid = grid();
        let mut ant = Ant::new(AntId(0), GridPos::new(3, 4), &SimulationConfig::default());
        ant.target = Some(GridPos::new(3, 9));
        assert!(!move_toward_target(&mut ant, &grid));
        assert!(!move_toward_target(&mut ant, &grid));
        assert_eq!(ant.position, GridPos::new(3, 4));
        assert_eq!(ant.stuck_counter, 2);

        ant.target = Some(GridPos::new(0, 0));
        assert!(move_toward_target(&mut ant, &grid));
        assert_eq!(ant.stuck_counter, 0);
    }

    #[test]
    fn test_off_grid_is_blocked() {
        let grid = grid();
        let mut ant = Ant::new(AntId(0), GridPos::new(0, 0), &SimulationConfig::default());
        ant.target = Some(GridPos::new(-5, -5));
        assert!(!move_toward_target(&mut ant, &grid));
        assert_eq!(ant.stuck_counter, 1);
    }

    #[test]
    fn test_no_target_no_move() {
        let grid = grid();
        let mut ant = Ant::new(AntId(0), GridPos::new(2, 2), &SimulationConfig::default());
        assert!(!move_toward_target(&mut ant, &grid));
        assert_eq!(ant.stuck_counter, 0);
    }
}
