//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The `World` owns one of these and
//! hands it down by reference; there is no global instance.

use crate::core::error::{ColonyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on the memory horizon, about a century
const MAX_MEMORY_HORIZON_SECS: f32 = 3.2e9;

/// Configuration for the colony simulation
///
/// Defaults are the values the colony is balanced around. Every field can
/// be overridden from a TOML file; missing keys keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === WORLD ===
    /// Grid width in cells
    pub width: usize,

    /// Grid height in cells
    ///
    /// The top quarter is open air; soil starts at `height / 4`.
    pub height: usize,

    /// Number of ants placed in the starting chamber
    pub initial_ants: usize,

    /// Side length of the square starting chamber (cells)
    pub chamber_size: i32,

    /// Number of attempts to scatter food on the surface at world creation
    pub initial_food_attempts: usize,

    /// Range of food placed per successful initial attempt
    pub initial_food_min: f32,
    pub initial_food_max: f32,

    // === ANT BODY ===
    /// Energy ceiling; new ants start full
    pub max_energy: f32,

    /// Energy lost every tick regardless of task
    ///
    /// At 0.1 a full ant starves after 1000 ticks without resting.
    pub energy_decay: f32,

    /// Below this energy the fallback policy sends ants home or to rest
    pub low_energy_threshold: f32,

    /// Energy recovered per tick of Rest
    pub rest_recovery: f32,

    /// Fraction of max energy at which a resting ant goes back to exploring
    pub rest_exit_ratio: f32,

    /// Maximum food an ant can carry
    pub carrying_capacity: f32,

    /// Half-width of the square window an ant can see (cells)
    pub vision_radius: i32,

    // === DECISIONS ===
    /// Ticks between policy consultations
    pub decision_cooldown_base: i32,

    /// Uniform jitter (+/-) added to the cooldown to desynchronise ants
    pub decision_cooldown_jitter: i32,

    // === MOVEMENT ===
    /// Failed moves tolerated before an explore target is abandoned
    pub stuck_threshold: u32,

    /// Distance range for random exploration targets
    pub explore_distance_min: i32,
    pub explore_distance_max: i32,

    /// Length of the recent-positions ring buffer
    pub movement_history: usize,

    // === PHEROMONES ===
    /// Multiplicative decay applied to both fields and to each ant every tick
    pub pheromone_decay: f32,

    /// Ceiling for any pheromone cell
    pub pheromone_max: f32,

    /// Home scent dropped per tick by an ant carrying food
    pub home_pheromone_deposit: f32,

    /// Food scent dropped per tick by an ant heading to food
    pub food_pheromone_deposit: f32,

    // === FOOD ===
    /// Probability per tick that one surface cell receives new food
    pub food_spawn_probability: f64,

    /// Cells at or above this amount are skipped by respawn
    pub food_spawn_cap: f32,

    /// Range of food added by one respawn
    pub food_spawn_min: f32,
    pub food_spawn_max: f32,

    // === DIGGING ===
    /// Energy paid to convert one soil cell to tunnel
    pub dig_energy_cost: f32,

    // === MEMORY ===
    /// Maximum memories per ant; least important are evicted first
    pub memory_capacity: usize,

    /// Wall-clock horizon over which memory importance fades (seconds)
    ///
    /// At 3600 a memory reaches its floor after one hour.
    pub memory_horizon_secs: f32,

    /// Fraction of base importance a fully aged memory keeps
    pub memory_importance_floor: f32,

    /// How many recent memories are summarised for the decision policy
    pub recent_memory_digest: usize,

    /// Importance multiplier for a memory told by a followed peer
    pub shared_memory_discount: f32,

    // === RELATIONSHIPS ===
    /// Strength gained per interaction
    pub relationship_increment: f32,

    /// Relationship strength ceiling
    pub relationship_max: f32,

    /// Distance within which a follower interacts with its target
    pub interaction_distance: f32,

    /// Distance within which a helper can hand over energy
    pub help_distance: f32,

    /// Energy the helped ant receives
    pub help_energy_transfer: f32,

    // === COLONY GROWTH ===
    /// Stored food required before the colony grows
    pub growth_food_threshold: f32,

    /// Population ceiling for growth
    pub max_population: usize,

    /// Growth is evaluated on frames that are multiples of this
    ///
    /// 1800 frames is 30 seconds at 60 ticks per second.
    pub growth_interval: u64,

    /// Memories copied from the most experienced ant to a newborn
    pub inherited_memories: usize,

    /// Importance multiplier for inherited memories
    pub inherited_memory_discount: f32,

    /// Bounded length of an ant's preferred-task list
    pub preferred_task_limit: usize,

    // === ORACLE ===
    /// Minimum spacing between external oracle calls (milliseconds)
    pub oracle_min_interval_ms: u64,

    /// Upper bound for one oracle round-trip (milliseconds)
    pub oracle_timeout_ms: u64,

    /// Number of cached oracle decisions before the cache is cleared
    pub oracle_cache_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            // World (1400x900 window at 4px cells)
            width: 350,
            height: 225,
            initial_ants: 12,
            chamber_size: 10,
            initial_food_attempts: 50,
            initial_food_min: 1.0,
            initial_food_max: 5.0,

            // Body
            max_energy: 100.0,
            energy_decay: 0.1,
            low_energy_threshold: 30.0,
            rest_recovery: 2.0,
            rest_exit_ratio: 0.8,
            carrying_capacity: 3.0,
            vision_radius: 8,

            // Decisions
            decision_cooldown_base: 30,
            decision_cooldown_jitter: 5,

            // Movement
            stuck_threshold: 10,
            explore_distance_min: 10,
            explore_distance_max: 30,
            movement_history: 20,

            // Pheromones
            pheromone_decay: 0.995,
            pheromone_max: 100.0,
            home_pheromone_deposit: 10.0,
            food_pheromone_deposit: 5.0,

            // Food
            food_spawn_probability: 0.001,
            food_spawn_cap: 10.0,
            food_spawn_min: 0.5,
            food_spawn_max: 2.0,

            // Digging
            dig_energy_cost: 5.0,

            // Memory
            memory_capacity: 50,
            memory_horizon_secs: 3600.0,
            memory_importance_floor: 0.1,
            recent_memory_digest: 5,
            shared_memory_discount: 0.5,

            // Relationships
            relationship_increment: 5.0,
            relationship_max: 100.0,
            interaction_distance: 2.0,
            help_distance: 1.0,
            help_energy_transfer: 5.0,

            // Growth
            growth_food_threshold: 50.0,
            max_population: 30,
            growth_interval: 1800,
            inherited_memories: 3,
            inherited_memory_discount: 0.3,
            preferred_task_limit: 3,

            // Oracle
            oracle_min_interval_ms: 100,
            oracle_timeout_ms: 2000,
            oracle_cache_capacity: 100,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, then validate it
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string, then validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(ColonyError::ConfigError)?;
        Ok(config)
    }

    pub fn oracle_min_interval(&self) -> Duration {
        Duration::from_millis(self.oracle_min_interval_ms)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    /// Surface row: air above, soil from here down
    pub fn ground_level(&self) -> i32 {
        (self.height / 4) as i32
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            ));
        }

        for (name, value) in self.float_knobs() {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} ({}) must be finite and non-negative", name, value));
            }
        }

        if !(self.pheromone_decay > 0.0 && self.pheromone_decay < 1.0) {
            return Err(format!(
                "pheromone_decay ({}) must be in (0, 1)",
                self.pheromone_decay
            ));
        }

        if self.pheromone_max <= 0.0 {
            return Err("pheromone_max must be positive".into());
        }

        if self.max_energy <= 0.0 || self.energy_decay <= 0.0 {
            return Err("max_energy and energy_decay must be positive".into());
        }

        if !(0.0..=1.0).contains(&self.rest_exit_ratio) {
            return Err(format!(
                "rest_exit_ratio ({}) must be in [0, 1]",
                self.rest_exit_ratio
            ));
        }

        if !(0.0..=1.0).contains(&self.food_spawn_probability) {
            return Err("food_spawn_probability must be a probability".into());
        }

        if self.food_spawn_min > self.food_spawn_max
            || self.initial_food_min > self.initial_food_max
            || self.explore_distance_min > self.explore_distance_max
        {
            return Err("range minimums must not exceed maximums".into());
        }

        if self.memory_capacity == 0 || self.oracle_cache_capacity == 0 {
            return Err("memory_capacity and oracle_cache_capacity must be positive".into());
        }

        if !(0.0..=1.0).contains(&self.memory_importance_floor) {
            return Err("memory_importance_floor must be in [0, 1]".into());
        }

        if self.memory_horizon_secs <= 0.0 || self.memory_horizon_secs > MAX_MEMORY_HORIZON_SECS {
            return Err(format!(
                "memory_horizon_secs ({}) must be in (0, {}]",
                self.memory_horizon_secs, MAX_MEMORY_HORIZON_SECS
            ));
        }

        if self.growth_interval == 0 {
            return Err("growth_interval must be positive".into());
        }

        if self.decision_cooldown_jitter < 0 {
            return Err("decision_cooldown_jitter must not be negative".into());
        }

        Ok(())
    }

    /// Every floating-point knob, by name
    fn float_knobs(&self) -> [(&'static str, f64); 27] {
        [
            ("initial_food_min", self.initial_food_min as f64),
            ("initial_food_max", self.initial_food_max as f64),
            ("max_energy", self.max_energy as f64),
            ("energy_decay", self.energy_decay as f64),
            ("low_energy_threshold", self.low_energy_threshold as f64),
            ("rest_recovery", self.rest_recovery as f64),
            ("rest_exit_ratio", self.rest_exit_ratio as f64),
            ("carrying_capacity", self.carrying_capacity as f64),
            ("pheromone_decay", self.pheromone_decay as f64),
            ("pheromone_max", self.pheromone_max as f64),
            ("home_pheromone_deposit", self.home_pheromone_deposit as f64),
            ("food_pheromone_deposit", self.food_pheromone_deposit as f64),
            ("food_spawn_probability", self.food_spawn_probability),
            ("food_spawn_cap", self.food_spawn_cap as f64),
            ("food_spawn_min", self.food_spawn_min as f64),
            ("food_spawn_max", self.food_spawn_max as f64),
            ("dig_energy_cost", self.dig_energy_cost as f64),
            ("memory_horizon_secs", self.memory_horizon_secs as f64),
            ("memory_importance_floor", self.memory_importance_floor as f64),
            ("shared_memory_discount", self.shared_memory_discount as f64),
            ("relationship_increment", self.relationship_increment as f64),
            ("relationship_max", self.relationship_max as f64),
            ("interaction_distance", self.interaction_distance as f64),
            ("help_distance", self.help_distance as f64),
            ("help_energy_transfer", self.help_energy_transfer as f64),
            ("growth_food_threshold", self.growth_food_threshold as f64),
            ("inherited_memory_discount", self.inherited_memory_discount as f64),
        ]
    }
}
