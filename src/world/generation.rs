//! Initial world layout: surface, nest chamber, starting food and ants

use crate::core::config::SimulationConfig;
use crate::core::types::GridPos;
use crate::world::field::FieldGrid;
use crate::world::terrain::TerrainCell;
use rand::Rng;

/// Centre of the starting chamber
pub fn chamber_center(config: &SimulationConfig) -> GridPos {
    GridPos::new(
        (config.width / 2) as i32,
        config.ground_level() + config.chamber_size,
    )
}

/// Build the initial terrain
///
/// Air above ground level, soil below, a square tunnel chamber around
/// `chamber_center` and a one-cell shaft from the surface down into it.
pub fn generate_terrain(config: &SimulationConfig) -> FieldGrid {
    let mut grid = FieldGrid::new(config.width, config.height, config.pheromone_max);
    let ground = config.ground_level();

    for y in 0..ground {
        for x in 0..config.width as i32 {
            grid.set_terrain(x, y, TerrainCell::Air);
        }
    }

    let center = chamber_center(config);
    let half = config.chamber_size / 2;
    for x in center.x - half..center.x + half {
        for y in center.y - half..center.y + half {
            grid.set_terrain(x, y, TerrainCell::Tunnel);
        }
    }

    for y in ground..center.y {
        grid.set_terrain(center.x, y, TerrainCell::Tunnel);
    }

    grid
}

/// Scatter food on open surface cells around ground level
pub fn scatter_initial_food<R: Rng>(grid: &mut FieldGrid, config: &SimulationConfig, rng: &mut R) {
    if config.width == 0 {
        return;
    }
    let ground = config.ground_level();

    for _ in 0..config.initial_food_attempts {
        let x = rng.gen_range(0..config.width as i32);
        let y = rng.gen_range((ground - 10).max(0)..=ground + 5);

        if grid.terrain_at(x, y) == Some(TerrainCell::Air) {
            let amount = rng.gen_range(config.initial_food_min..=config.initial_food_max);
            grid.add_food(x, y, amount);
        }
    }
}

/// Starting positions for the founding ants
///
/// Each ant gets a random offset of up to three cells from the chamber
/// centre and is kept only if that lands in a tunnel. If none land, every
/// ant starts at the centre.
pub fn initial_ant_positions<R: Rng>(
    grid: &FieldGrid,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<GridPos> {
    let center = chamber_center(config);

    let positions: Vec<GridPos> = (0..config.initial_ants)
        .map(|_| center.offset(rng.gen_range(-3..=3), rng.gen_range(-3..=3)))
        .filter(|pos| grid.is_tunnel(pos.x, pos.y))
        .collect();

    if positions.is_empty() {
        vec![center; config.initial_ants]
    } else {
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            width: 60,
            height: 60,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_surface_is_air_and_underground_is_soil() {
        let config = small_config();
        let grid = generate_terrain(&config);
        let ground = config.ground_level();

        assert_eq!(grid.terrain_at(0, 0), Some(TerrainCell::Air));
        assert_eq!(grid.terrain_at(0, ground - 1), Some(TerrainCell::Air));
        assert_eq!(grid.terrain_at(0, ground), Some(TerrainCell::Soil));
        assert_eq!(grid.terrain_at(59, 59), Some(TerrainCell::Soil));
    }

    #[test]
    fn test_chamber_and_shaft_are_tunnel() {
        let config = small_config();
        let grid = generate_terrain(&config);
        let center = chamber_center(&config);

        assert!(grid.is_tunnel(center.x, center.y));
        assert!(grid.is_tunnel(center.x - 5, center.y - 5));
        assert!(!grid.is_tunnel(center.x + 5, center.y));

        for y in config.ground_level()..center.y {
            assert!(grid.is_tunnel(center.x, y), "shaft broken at y={}", y);
        }
    }

    #[test]
    fn test_initial_food_only_on_air() {
        let config = small_config();
        let mut grid = generate_terrain(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        scatter_initial_food(&mut grid, &config, &mut rng);

        assert!(grid.total_food() > 0.0);
        for y in 0..config.height as i32 {
            for x in 0..config.width as i32 {
                if grid.food_at(x, y) > 0.0 {
                    assert_eq!(grid.terrain_at(x, y), Some(TerrainCell::Air));
                }
            }
        }
    }

    #[test]
    fn test_initial_ants_start_in_tunnels() {
        let config = small_config();
        let grid = generate_terrain(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let positions = initial_ant_positions(&grid, &config, &mut rng);

        assert!(!positions.is_empty());
        assert!(positions.len() <= config.initial_ants);
        for pos in positions {
            assert!(grid.is_tunnel(pos.x, pos.y));
        }
    }
}
