//! The field grid: terrain, food, and the two scent layers
//!
//! Every query accepts any coordinate. Outside the grid, predicates are
//! `false`, quantities are `0.0`, and mutations do nothing, so callers
//! never bounds-check first.

use crate::core::types::GridPos;
use crate::spatial::grid::Grid;
use crate::world::terrain::{PheromoneKind, TerrainCell};
use rand::Rng;
use std::ops::RangeInclusive;

#[derive(Debug, Clone)]
pub struct FieldGrid {
    terrain: Grid<TerrainCell>,
    food: Grid<f32>,
    pheromone_food: Grid<f32>,
    pheromone_home: Grid<f32>,
    pheromone_max: f32,
    tunnels_dug: u32,
}

impl FieldGrid {
    /// Solid soil everywhere, no food, no scent
    pub fn new(width: usize, height: usize, pheromone_max: f32) -> Self {
        Self {
            terrain: Grid::filled(width, height, TerrainCell::Soil),
            food: Grid::new(width, height),
            pheromone_food: Grid::new(width, height),
            pheromone_home: Grid::new(width, height),
            pheromone_max,
            tunnels_dug: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.terrain.width
    }

    pub fn height(&self) -> usize {
        self.terrain.height
    }

    pub fn pheromone_max(&self) -> f32 {
        self.pheromone_max
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        self.terrain.contains(x, y)
    }

    pub fn terrain_at(&self, x: i32, y: i32) -> Option<TerrainCell> {
        self.terrain.get(x, y).copied()
    }

    /// Overwrite terrain directly; used by world generation and fixtures
    pub fn set_terrain(&mut self, x: i32, y: i32, cell: TerrainCell) {
        self.terrain.set(x, y, cell);
    }

    /// True for Air and Tunnel; false for Soil and off-grid
    pub fn can_enter(&self, x: i32, y: i32) -> bool {
        self.terrain_at(x, y).is_some_and(|t| t.is_walkable())
    }

    pub fn can_dig(&self, x: i32, y: i32) -> bool {
        self.terrain_at(x, y) == Some(TerrainCell::Soil)
    }

    pub fn is_tunnel(&self, x: i32, y: i32) -> bool {
        self.terrain_at(x, y) == Some(TerrainCell::Tunnel)
    }

    /// Turn soil into tunnel. Returns whether anything was dug.
    pub fn dig_tunnel(&mut self, x: i32, y: i32) -> bool {
        if !self.can_dig(x, y) {
            return false;
        }
        self.terrain.set(x, y, TerrainCell::Tunnel);
        self.tunnels_dug += 1;
        true
    }

    pub fn tunnels_dug(&self) -> u32 {
        self.tunnels_dug
    }

    /// All tunnel cells in row-major order
    pub fn tunnel_cells(&self) -> Vec<GridPos> {
        self.terrain
            .iter()
            .filter(|(_, t)| **t == TerrainCell::Tunnel)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn food_at(&self, x: i32, y: i32) -> f32 {
        self.food.get_or_default(x, y)
    }

    pub fn add_food(&mut self, x: i32, y: i32, amount: f32) {
        if let Some(cell) = self.food.get_mut(x, y) {
            *cell = (*cell + amount).max(0.0);
        }
    }

    /// Remove up to `amount`; returns what was actually taken
    pub fn take_food(&mut self, x: i32, y: i32, amount: f32) -> f32 {
        match self.food.get_mut(x, y) {
            Some(cell) => {
                let taken = amount.max(0.0).min(*cell);
                *cell -= taken;
                taken
            }
            None => 0.0,
        }
    }

    /// Food lying on the ground across the whole grid
    pub fn total_food(&self) -> f32 {
        self.food.iter().map(|(_, v)| *v).sum()
    }

    pub fn pheromone_at(&self, x: i32, y: i32, kind: PheromoneKind) -> f32 {
        self.layer(kind).get_or_default(x, y)
    }

    pub fn deposit_home_pheromone(&mut self, x: i32, y: i32, amount: f32) {
        self.deposit(PheromoneKind::Home, x, y, amount);
    }

    pub fn deposit_food_pheromone(&mut self, x: i32, y: i32, amount: f32) {
        self.deposit(PheromoneKind::Food, x, y, amount);
    }

    fn deposit(&mut self, kind: PheromoneKind, x: i32, y: i32, amount: f32) {
        let max = self.pheromone_max;
        if let Some(cell) = self.layer_mut(kind).get_mut(x, y) {
            *cell = (*cell + amount).clamp(0.0, max);
        }
    }

    /// Multiply both scent fields by `rate`
    pub fn decay_pheromones(&mut self, rate: f32) {
        let rate = rate.max(0.0);
        let max = self.pheromone_max;
        let decay = |v: &mut f32| *v = (*v * rate).clamp(0.0, max);
        self.pheromone_food.map_in_place(decay);
        self.pheromone_home.map_in_place(decay);
    }

    /// With `probability`, drop food on one sampled surface cell
    ///
    /// The cell is drawn with a uniform x and a y from `rows`. Only open air
    /// below `max_per_cell` receives food. Returns the cell and amount added.
    pub fn random_food_spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        probability: f64,
        max_per_cell: f32,
        rows: RangeInclusive<i32>,
        amount: RangeInclusive<f32>,
    ) -> Option<(GridPos, f32)> {
        if self.width() == 0 || !rng.gen_bool(probability.clamp(0.0, 1.0)) {
            return None;
        }

        let x = rng.gen_range(0..self.width() as i32);
        let y = rng.gen_range(rows);

        if self.terrain_at(x, y) != Some(TerrainCell::Air) || self.food_at(x, y) >= max_per_cell {
            return None;
        }

        let added = rng.gen_range(amount);
        self.add_food(x, y, added);
        Some((GridPos::new(x, y), added))
    }

    fn layer(&self, kind: PheromoneKind) -> &Grid<f32> {
        match kind {
            PheromoneKind::Food => &self.pheromone_food,
            PheromoneKind::Home => &self.pheromone_home,
        }
    }

    fn layer_mut(&mut self, kind: PheromoneKind) -> &mut Grid<f32> {
        match kind {
            PheromoneKind::Food => &mut self.pheromone_food,
            PheromoneKind::Home => &mut self.pheromone_home,
        }
    }
}
