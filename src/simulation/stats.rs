//! Read-only projections of the world for renderers, logs and tests

use crate::core::types::{AntId, GridPos, Tick};
use crate::ecs::world::World;
use crate::entity::ant::Ant;
use crate::entity::memory::MemoryKind;
use crate::entity::tasks::TaskKind;
use serde::Serialize;

/// Aggregate colony statistics, recomputed on every call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldStats {
    pub frame: Tick,
    pub alive: usize,
    pub average_energy: f32,
    pub food_storage: f32,
    pub total_food_collected: f32,
    pub food_carried: f32,
    pub food_on_ground: f32,
    pub tunnels_dug: u32,
    pub generation: u32,
}

impl WorldStats {
    pub fn collect(world: &World) -> Self {
        let ants = world.ants();
        let alive = ants.iter().filter(|a| a.alive).count();
        let average_energy = if alive == 0 {
            0.0
        } else {
            ants.iter().filter(|a| a.alive).map(|a| a.energy).sum::<f32>() / alive as f32
        };

        Self {
            frame: world.frame_count,
            alive,
            average_energy,
            food_storage: world.colony.food_storage,
            total_food_collected: world.colony.total_food_collected,
            food_carried: ants.iter().map(|a| a.carried_food).sum(),
            food_on_ground: world.grid.total_food(),
            tunnels_dug: world.grid.tunnels_dug(),
            generation: world.generation,
        }
    }
}

impl std::fmt::Display for WorldStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame {} | ants {} | avg energy {:.1} | storage {:.1} | collected {:.1} | tunnels {} | gen {}",
            self.frame,
            self.alive,
            self.average_energy,
            self.food_storage,
            self.total_food_collected,
            self.tunnels_dug,
            self.generation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub content: String,
    pub kind: MemoryKind,
    pub importance: f32,
    pub location: GridPos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipSnapshot {
    pub peer: AntId,
    pub strength: f32,
    pub interaction_count: u32,
}

/// Per-ant view for debuggers and renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntSnapshot {
    pub id: AntId,
    pub position: GridPos,
    pub energy: f32,
    pub task: TaskKind,
    pub carried_food: f32,
    pub age: u32,
    pub experience: u32,
    pub generation: u32,
    /// Most recently successful task kinds first
    pub preferred_tasks: Vec<TaskKind>,
    pub pheromone_strength: f32,
    pub memories: Vec<MemorySnapshot>,
    pub relationships: Vec<RelationshipSnapshot>,
}

impl From<&Ant> for AntSnapshot {
    fn from(ant: &Ant) -> Self {
        Self {
            id: ant.id,
            position: ant.position,
            energy: ant.energy,
            task: ant.current_task,
            carried_food: ant.carried_food,
            age: ant.age,
            experience: ant.experience,
            generation: ant.generation,
            preferred_tasks: ant.preferred_tasks.clone(),
            pheromone_strength: ant.pheromone_strength,
            memories: ant
                .memories
                .iter()
                .map(|m| MemorySnapshot {
                    content: m.content.clone(),
                    kind: m.kind,
                    importance: m.importance,
                    location: m.location,
                })
                .collect(),
            relationships: ant
                .relationships
                .sorted()
                .into_iter()
                .map(|r| RelationshipSnapshot {
                    peer: r.peer,
                    strength: r.strength,
                    interaction_count: r.interaction_count,
                })
                .collect(),
        }
    }
}
