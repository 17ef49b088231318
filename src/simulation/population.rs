//! Colony growth system
//!
//! A well-fed colony hatches a new ant every growth interval. The newborn
//! starts in a random tunnel and inherits a few memories and the task
//! preferences of the most experienced living ant.

use crate::core::config::SimulationConfig;
use crate::core::types::{AntId, GridPos};
use crate::ecs::world::World;
use crate::entity::ant::Ant;
use crate::entity::memory::MemoryKind;
use crate::simulation::tick::SimulationEvent;
use rand::seq::SliceRandom;
use rand::Rng;

/// Storage above threshold, room in the colony, and on an interval frame
pub fn growth_due(world: &World) -> bool {
    let config = &world.config;
    world.colony.food_storage > config.growth_food_threshold
        && world.population() < config.max_population
        && world.frame_count % config.growth_interval.max(1) == 0
}

/// Living ant with the most experience; the earliest wins ties
pub fn most_experienced(ants: &[Ant]) -> Option<&Ant> {
    ants.iter()
        .filter(|ant| ant.alive)
        .fold(None, |best: Option<&Ant>, ant| match best {
            Some(b) if b.experience >= ant.experience => Some(b),
            _ => Some(ant),
        })
}

/// Build a newborn, optionally inheriting from `parent`
///
/// Inherited memories keep their original timestamp, are relabelled and
/// have their importance discounted.
pub fn offspring<R: Rng>(
    id: AntId,
    position: GridPos,
    parent: Option<&Ant>,
    config: &SimulationConfig,
    rng: &mut R,
) -> Ant {
    let mut child = Ant::new(id, position, config);
    let Some(parent) = parent else {
        return child;
    };

    child.generation = parent.generation + 1;
    child.preferred_tasks = parent.preferred_tasks.clone();
    for memory in parent.memories.sample(rng, config.inherited_memories) {
        child.remember_with_importance(
            format!("Inherited: {}", memory.content),
            MemoryKind::Inherited,
            memory.importance * config.inherited_memory_discount,
            memory.created_at,
        );
    }
    child
}

/// Hatch one ant if growth is due and there is a tunnel to hatch in
pub fn try_colony_growth(world: &mut World, events: &mut Vec<SimulationEvent>) -> Option<AntId> {
    if !growth_due(world) {
        return None;
    }

    let tunnels = world.grid.tunnel_cells();
    let position = *tunnels.choose(&mut world.rng)?;
    let id = world.allocate_id();

    let parent = most_experienced(&world.ants);
    let parent_id = parent.map(|p| p.id);
    let child = offspring(id, position, parent, &world.config, &mut world.rng);
    let generation = child.generation;
    world.insert_ant(child);

    tracing::info!(
        ant = %id,
        parent = ?parent_id.map(|p| p.0),
        generation,
        population = world.population(),
        "New ant hatched"
    );
    events.push(SimulationEvent::AntBorn {
        ant: id,
        parent: parent_id,
        at: position,
    });
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::tasks::TaskKind;
    use crate::world::field::FieldGrid;
    use crate::world::terrain::TerrainCell;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::SystemTime;

    fn world_with_tunnel() -> World {
        let mut grid = FieldGrid::new(10, 10, 100.0);
        grid.set_terrain(4, 4, TerrainCell::Tunnel);
        let mut world = World::with_grid(SimulationConfig::default(), grid, 5);
        world.spawn_ant(GridPos::new(4, 4));
        world
    }

    #[test]
    fn test_growth_requires_storage() {
        let mut world = world_with_tunnel();
        world.frame_count = 1800;
        assert!(!growth_due(&world));
        world.colony.deposit(50.0);
        assert!(!growth_due(&world), "threshold is exclusive");
        world.colony.deposit(0.5);
        assert!(growth_due(&world));
    }

    #[test]
    fn test_growth_only_on_interval_frames() {
        let mut world = world_with_tunnel();
        world.colony.deposit(100.0);
        world.frame_count = 1799;
        assert!(!growth_due(&world));
        world.frame_count = 3600;
        assert!(growth_due(&world));
    }

    #[test]
    fn test_growth_respects_population_cap() {
        let mut world = world_with_tunnel();
        world.colony.deposit(100.0);
        world.frame_count = 1800;
        while world.population() < world.config.max_population {
            world.spawn_ant(GridPos::new(4, 4));
        }
        assert!(!growth_due(&world));
    }

    #[test]
    fn test_most_experienced_prefers_first_on_tie() {
        let config = SimulationConfig::default();
        let mut ants: Vec<Ant> = (0..3)
            .map(|i| Ant::new(AntId(i), GridPos::default(), &config))
            .collect();
        ants[1].experience = 4;
        ants[2].experience = 4;
        assert_eq!(most_experienced(&ants).map(|a| a.id), Some(AntId(1)));

        ants[1].alive = false;
        assert_eq!(most_experienced(&ants).map(|a| a.id), Some(AntId(2)));
        assert!(most_experienced(&[]).is_none());
    }

    #[test]
    fn test_offspring_inherits_discounted_memories() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut parent = Ant::new(AntId(0), GridPos::new(1, 1), &config);
        let then = SystemTime::UNIX_EPOCH;
        for i in 0..5 {
            parent.remember_with_importance(format!("m{}", i), MemoryKind::PathLearned, 0.5, then);
        }
        parent.preferred_tasks = vec![TaskKind::DigTunnel];
        parent.generation = 2;

        let child = offspring(AntId(9), GridPos::new(3, 3), Some(&parent), &config, &mut rng);

        assert_eq!(child.generation, 3);
        assert_eq!(child.preferred_tasks, vec![TaskKind::DigTunnel]);
        assert_eq!(child.memories.len(), 3);
        for memory in child.memories.iter() {
            assert!(memory.content.starts_with("Inherited: m"));
            assert_eq!(memory.kind, MemoryKind::Inherited);
            assert!((memory.importance - 0.15).abs() < 1e-6);
            assert_eq!(memory.created_at, then);
        }
    }

    #[test]
    fn test_colony_growth_hatches_in_tunnel() {
        let mut world = world_with_tunnel();
        world.colony.deposit(60.0);
        world.frame_count = 1800;
        let mut events = Vec::new();

        let id = try_colony_growth(&mut world, &mut events).unwrap();

        assert_eq!(world.population(), 2);
        assert_eq!(world.get(id).unwrap().position, GridPos::new(4, 4));
        assert_eq!(world.generation, 2);
        assert!(matches!(
            events.as_slice(),
            [SimulationEvent::AntBorn { parent: Some(AntId(0)), .. }]
        ));
    }

    #[test]
    fn test_no_tunnel_no_birth() {
        let mut world =
            World::with_grid(SimulationConfig::default(), FieldGrid::new(5, 5, 100.0), 0);
        world.colony.deposit(60.0);
        world.frame_count = 1800;
        assert!(try_colony_growth(&mut world, &mut Vec::new()).is_none());
        assert_eq!(world.population(), 0);
    }
}
