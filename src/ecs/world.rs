//! World - owns the field grid, the ant population and colony stores

use crate::core::config::SimulationConfig;
use crate::core::error::{ColonyError, Result};
use crate::core::types::{AntId, GridPos, Tick};
use crate::entity::ant::Ant;
use crate::simulation::decision::DecisionPolicy;
use crate::simulation::stats::{AntSnapshot, WorldStats};
use crate::simulation::tick::{run_simulation_tick, SimulationEvent};
use crate::world::field::FieldGrid;
use crate::world::generation::{generate_terrain, initial_ant_positions, scatter_initial_food};
use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Food the colony has banked
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub food_storage: f32,
    /// Everything ever delivered; never decreases
    pub total_food_collected: f32,
}

impl Colony {
    pub fn deposit(&mut self, amount: f32) {
        if amount > 0.0 {
            self.food_storage += amount;
            self.total_food_collected += amount;
        }
    }
}

/// The simulated world
///
/// Ants live in a dense vector in spawn order; `index` maps ids to slots and
/// is rebuilt whenever dead ants are swept out. Ants refer to each other
/// only by [`AntId`].
pub struct World {
    pub config: SimulationConfig,
    pub grid: FieldGrid,
    pub colony: Colony,
    pub frame_count: Tick,
    /// Deepest generation born so far
    pub generation: u32,
    pub(crate) ants: Vec<Ant>,
    index: AHashMap<AntId, usize>,
    next_id: u32,
    pub(crate) rng: ChaCha8Rng,
}

impl World {
    /// Generate a fresh colony seeded from OS entropy
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::generate(config, ChaCha8Rng::from_entropy())
    }

    /// Generate a fresh colony; identical seeds give identical worlds
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::generate(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn generate(config: SimulationConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        config.validate().map_err(ColonyError::ConfigError)?;

        let mut grid = generate_terrain(&config);
        scatter_initial_food(&mut grid, &config, &mut rng);
        let positions = initial_ant_positions(&grid, &config, &mut rng);

        let mut world = Self::from_parts(config, grid, rng);
        for position in positions {
            world.spawn_ant(position);
        }

        tracing::info!(
            width = world.grid.width(),
            height = world.grid.height(),
            ants = world.ants.len(),
            food = world.grid.total_food(),
            "World generated"
        );
        Ok(world)
    }

    /// A world over a prepared grid with no ants
    pub fn with_grid(config: SimulationConfig, grid: FieldGrid, seed: u64) -> Self {
        Self::from_parts(config, grid, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_parts(config: SimulationConfig, grid: FieldGrid, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            grid,
            colony: Colony::default(),
            frame_count: 0,
            generation: 1,
            ants: Vec::new(),
            index: AHashMap::new(),
            next_id: 0,
            rng,
        }
    }

    pub(crate) fn allocate_id(&mut self) -> AntId {
        let id = AntId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a founder ant at `position`
    pub fn spawn_ant(&mut self, position: GridPos) -> AntId {
        let id = self.allocate_id();
        let ant = Ant::new(id, position, &self.config);
        self.insert_ant(ant);
        id
    }

    pub(crate) fn insert_ant(&mut self, ant: Ant) {
        self.generation = self.generation.max(ant.generation);
        self.index.insert(ant.id, self.ants.len());
        self.ants.push(ant);
    }

    pub fn get(&self, id: AntId) -> Option<&Ant> {
        self.index.get(&id).and_then(|&i| self.ants.get(i))
    }

    pub fn get_mut(&mut self, id: AntId) -> Option<&mut Ant> {
        match self.index.get(&id) {
            Some(&i) => self.ants.get_mut(i),
            None => None,
        }
    }

    /// Live ants in update order
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn population(&self) -> usize {
        self.ants.len()
    }

    /// Drop ants that died and return them, oldest slot first
    pub(crate) fn sweep_dead(&mut self) -> Vec<Ant> {
        if self.ants.iter().all(|ant| ant.alive) {
            return Vec::new();
        }

        let (alive, dead): (Vec<Ant>, Vec<Ant>) =
            std::mem::take(&mut self.ants).into_iter().partition(|ant| ant.alive);
        self.ants = alive;
        self.index = self
            .ants
            .iter()
            .enumerate()
            .map(|(i, ant)| (ant.id, i))
            .collect();
        dead
    }

    /// Advance one tick
    pub fn tick(&mut self, policy: &mut dyn DecisionPolicy) -> Vec<SimulationEvent> {
        run_simulation_tick(self, policy)
    }

    pub fn statistics(&self) -> WorldStats {
        WorldStats::collect(self)
    }

    pub fn ant_snapshots(&self) -> Vec<AntSnapshot> {
        self.ants.iter().map(AntSnapshot::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            width: 80,
            height: 60,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_generated_world_has_founders_in_tunnels() {
        let world = World::with_seed(small_config(), 42).unwrap();
        assert_eq!(world.population(), 12);
        for ant in world.ants() {
            assert!(world.grid.is_tunnel(ant.position.x, ant.position.y));
        }
        assert!(world.grid.total_food() > 0.0);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = World::with_seed(small_config(), 9).unwrap();
        let b = World::with_seed(small_config(), 9).unwrap();
        let pa: Vec<_> = a.ants().iter().map(|ant| ant.position).collect();
        let pb: Vec<_> = b.ants().iter().map(|ant| ant.position).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.grid.total_food(), b.grid.total_food());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            pheromone_decay: 1.5,
            ..small_config()
        };
        assert!(matches!(
            World::with_seed(config, 1),
            Err(ColonyError::ConfigError(_))
        ));
    }

    #[test]
    fn test_sweep_dead_rebuilds_index() {
        let mut world = World::with_grid(small_config(), FieldGrid::new(10, 10, 100.0), 0);
        let a = world.spawn_ant(GridPos::new(1, 1));
        let b = world.spawn_ant(GridPos::new(2, 2));
        let c = world.spawn_ant(GridPos::new(3, 3));

        world.get_mut(b).unwrap().alive = false;
        let dead = world.sweep_dead();

        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, b);
        assert!(world.get(b).is_none());
        assert_eq!(world.get(a).unwrap().position, GridPos::new(1, 1));
        assert_eq!(world.get(c).unwrap().position, GridPos::new(3, 3));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut world = World::with_grid(small_config(), FieldGrid::new(10, 10, 100.0), 0);
        let a = world.spawn_ant(GridPos::new(1, 1));
        world.get_mut(a).unwrap().alive = false;
        world.sweep_dead();
        let b = world.spawn_ant(GridPos::new(1, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_colony_deposit() {
        let mut colony = Colony::default();
        colony.deposit(2.0);
        colony.deposit(-1.0);
        colony.deposit(1.5);
        assert_eq!(colony.food_storage, 3.5);
        assert_eq!(colony.total_food_collected, 3.5);
    }
}
