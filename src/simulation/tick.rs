//! Tick system - orchestrates simulation updates
//!
//! One tick:
//! 1. advance the frame counter
//! 2. update every living ant once, in population order
//! 3. sweep out ants that died during the pass
//! 4. maybe spawn surface food
//! 5. decay scent fields, then let ants lay fresh scent
//! 6. evaluate colony growth
//!
//! A tick runs to completion or not at all; nothing in it can fail.

use crate::core::types::{AntId, GridPos, Tick};
use crate::ecs::world::World;
use crate::entity::tasks::TaskKind;
use crate::simulation::behavior::{update_ant, TickEnv};
use crate::simulation::decision::DecisionPolicy;
use crate::simulation::perception::Peers;
use crate::simulation::population::try_colony_growth;
use serde::Serialize;
use std::time::SystemTime;

/// Events generated during a simulation tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// The decision policy moved an ant onto a new task
    TaskChanged {
        ant: AntId,
        from: TaskKind,
        to: TaskKind,
        tick: Tick,
    },
    FoodCollected {
        ant: AntId,
        amount: f32,
        at: GridPos,
    },
    FoodDelivered {
        ant: AntId,
        amount: f32,
    },
    TunnelDug {
        ant: AntId,
        at: GridPos,
    },
    /// A follower caught up with the ant it was trailing
    AntsMet {
        ant: AntId,
        peer: AntId,
    },
    AntHelped {
        helper: AntId,
        target: AntId,
    },
    AntDied {
        ant: AntId,
        age: u32,
        at: GridPos,
    },
    AntBorn {
        ant: AntId,
        parent: Option<AntId>,
        at: GridPos,
    },
    FoodSpawned {
        at: GridPos,
        amount: f32,
    },
}

/// Run a single simulation tick against the wall clock
pub fn run_simulation_tick(world: &mut World, policy: &mut dyn DecisionPolicy) -> Vec<SimulationEvent> {
    run_simulation_tick_at(world, policy, SystemTime::now())
}

/// Run a single simulation tick with `now` as the wall clock
pub fn run_simulation_tick_at(
    world: &mut World,
    policy: &mut dyn DecisionPolicy,
    now: SystemTime,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    world.frame_count += 1;

    update_ants(world, policy, now, &mut events);
    remove_dead(world, &mut events);
    spawn_food(world, &mut events);
    update_pheromones(world);
    try_colony_growth(world, &mut events);

    events
}

fn update_ants(
    world: &mut World,
    policy: &mut dyn DecisionPolicy,
    now: SystemTime,
    events: &mut Vec<SimulationEvent>,
) {
    let mut env = TickEnv {
        config: &world.config,
        grid: &mut world.grid,
        colony: &mut world.colony,
        rng: &mut world.rng,
        now,
        tick: world.frame_count,
        events,
    };

    for i in 0..world.ants.len() {
        let (before, rest) = world.ants.split_at_mut(i);
        let Some((ant, after)) = rest.split_first_mut() else {
            break;
        };
        if !ant.alive {
            continue;
        }
        let mut peers = Peers::new(before, after);
        update_ant(&mut env, ant, &mut peers, policy);
    }
}

fn remove_dead(world: &mut World, events: &mut Vec<SimulationEvent>) {
    for ant in world.sweep_dead() {
        tracing::info!(ant = %ant.id, age = ant.age, at = %ant.position, "Ant died");
        events.push(SimulationEvent::AntDied {
            ant: ant.id,
            age: ant.age,
            at: ant.position,
        });
    }
}

/// Surface food respawn in a band around ground level
fn spawn_food(world: &mut World, events: &mut Vec<SimulationEvent>) {
    let config = &world.config;
    let ground = config.ground_level();
    let spawned = world.grid.random_food_spawn(
        &mut world.rng,
        config.food_spawn_probability,
        config.food_spawn_cap,
        (ground - 5).max(0)..=ground + 3,
        config.food_spawn_min..=config.food_spawn_max,
    );

    if let Some((at, amount)) = spawned {
        tracing::debug!(%at, amount, "Food spawned");
        events.push(SimulationEvent::FoodSpawned { at, amount });
    }
}

/// Decay both scent fields, then deposit
///
/// Carrying ants lay home scent; ants heading for food lay food scent.
fn update_pheromones(world: &mut World) {
    world.grid.decay_pheromones(world.config.pheromone_decay);

    for ant in world.ants.iter().filter(|ant| ant.alive) {
        let (x, y) = (ant.position.x, ant.position.y);
        if ant.is_carrying() {
            world
                .grid
                .deposit_home_pheromone(x, y, world.config.home_pheromone_deposit);
        } else if ant.current_task == TaskKind::MoveToFood {
            world
                .grid
                .deposit_food_pheromone(x, y, world.config.food_pheromone_deposit);
        }
    }
}
