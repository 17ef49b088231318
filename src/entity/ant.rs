//! Ant state and the self-contained parts of its lifecycle
//!
//! Anything that touches the grid or other ants lives in
//! `simulation::behavior`; this module only mutates the ant itself.

use crate::core::config::SimulationConfig;
use crate::core::types::{AntId, GridPos};
use crate::entity::memory::{score_importance, Memory, MemoryKind, MemoryLog};
use crate::entity::relationships::RelationshipMap;
use crate::entity::tasks::TaskKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ant {
    pub id: AntId,
    pub position: GridPos,
    pub previous_position: GridPos,

    pub energy: f32,
    pub max_energy: f32,
    pub age: u32,
    pub carried_food: f32,
    pub alive: bool,

    pub current_task: TaskKind,
    pub target: Option<GridPos>,
    /// Ticks until the decision policy is consulted again
    pub decision_cooldown: i32,

    pub memories: MemoryLog,
    pub relationships: RelationshipMap,

    /// Ring buffer of recently visited cells, newest last
    pub recent_positions: VecDeque<GridPos>,
    history_len: usize,
    pub stuck_counter: u32,

    /// Scent charge carried by the ant; decays every tick
    pub pheromone_strength: f32,

    pub experience: u32,
    /// 1 for founders, parent's generation + 1 for ants born in the colony
    pub generation: u32,
    /// Tasks this ant has succeeded at, most recent first
    pub preferred_tasks: Vec<TaskKind>,
}

impl Ant {
    pub fn new(id: AntId, position: GridPos, config: &SimulationConfig) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            energy: config.max_energy,
            max_energy: config.max_energy,
            age: 0,
            carried_food: 0.0,
            alive: true,
            current_task: TaskKind::Explore,
            target: None,
            decision_cooldown: 0,
            memories: MemoryLog::new(config.memory_capacity),
            relationships: RelationshipMap::new(),
            recent_positions: VecDeque::with_capacity(config.movement_history),
            history_len: config.movement_history,
            stuck_counter: 0,
            pheromone_strength: 0.0,
            experience: 0,
            generation: 1,
            preferred_tasks: Vec::new(),
        }
    }

    /// Age one tick and pay the energy upkeep
    ///
    /// Returns false when the ant starved; it is then dead for good.
    pub fn metabolize(&mut self, energy_decay: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.age += 1;
        self.energy = (self.energy - energy_decay).max(0.0);
        if self.energy <= 0.0 {
            self.alive = false;
        }
        self.alive
    }

    /// Switch task, dropping any pending target. No-op if unchanged.
    pub fn switch_task(&mut self, task: TaskKind) -> bool {
        if task == self.current_task {
            return false;
        }
        self.current_task = task;
        self.target = None;
        true
    }

    pub fn gain_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, self.max_energy);
    }

    pub fn spend_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount).max(0.0);
    }

    /// Record a memory at the ant's position, scored from kind and wording
    pub fn remember(&mut self, content: impl Into<String>, kind: MemoryKind, now: SystemTime) {
        let content = content.into();
        let importance = score_importance(&content, kind);
        self.remember_with_importance(content, kind, importance, now);
    }

    /// Record a memory with an explicit importance
    pub fn remember_with_importance(
        &mut self,
        content: impl Into<String>,
        kind: MemoryKind,
        importance: f32,
        created_at: SystemTime,
    ) {
        self.memories
            .add(Memory::new(content, kind, importance, created_at, self.position));
    }

    /// Credit a completed task: experience, scent charge, preference
    pub fn record_success(&mut self, task: TaskKind, preferred_limit: usize) {
        self.experience += 1;
        self.pheromone_strength = 1.0;
        self.preferred_tasks.retain(|t| *t != task);
        self.preferred_tasks.insert(0, task);
        self.preferred_tasks.truncate(preferred_limit);
    }

    pub fn strengthen_relationship(&mut self, peer: AntId, config: &SimulationConfig, now: SystemTime) {
        self.relationships.strengthen(
            peer,
            config.relationship_increment,
            config.relationship_max,
            now,
        );
    }

    /// Move to `to`, remembering where we came from
    pub fn relocate(&mut self, to: GridPos) {
        self.previous_position = self.position;
        self.position = to;
    }

    pub fn push_history(&mut self) {
        if self.history_len == 0 {
            return;
        }
        if self.recent_positions.len() >= self.history_len {
            self.recent_positions.pop_front();
        }
        self.recent_positions.push_back(self.position);
    }

    /// Within one cell of the target on both axes, or no target at all
    pub fn reached_target(&self) -> bool {
        match self.target {
            Some(target) => self.position.chebyshev(&target) <= 1,
            None => true,
        }
    }

    pub fn is_carrying(&self) -> bool {
        self.carried_food > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ant() -> Ant {
        Ant::new(AntId(0), GridPos::new(5, 5), &SimulationConfig::default())
    }

    #[test]
    fn test_new_ant_is_full_and_exploring() {
        let ant = ant();
        assert!(ant.alive);
        assert_eq!(ant.energy, 100.0);
        assert_eq!(ant.current_task, TaskKind::Explore);
        assert_eq!(ant.decision_cooldown, 0);
    }

    #[test]
    fn test_metabolize_until_death() {
        let mut ant = ant();
        ant.energy = 0.25;
        assert!(ant.metabolize(0.1));
        assert!(ant.metabolize(0.1));
        assert!(!ant.metabolize(0.1));
        assert!(!ant.alive);
        assert_eq!(ant.age, 3);

        // Dead ants never revive or age
        assert!(!ant.metabolize(0.1));
        assert_eq!(ant.age, 3);
    }

    #[test]
    fn test_switch_task_clears_target_only_on_change() {
        let mut ant = ant();
        ant.target = Some(GridPos::new(9, 9));
        assert!(!ant.switch_task(TaskKind::Explore));
        assert!(ant.target.is_some());
        assert!(ant.switch_task(TaskKind::Rest));
        assert!(ant.target.is_none());
    }

    #[test]
    fn test_energy_stays_in_range() {
        let mut ant = ant();
        ant.gain_energy(50.0);
        assert_eq!(ant.energy, 100.0);
        ant.spend_energy(500.0);
        assert_eq!(ant.energy, 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut ant = ant();
        for i in 0..50 {
            ant.relocate(GridPos::new(i, 0));
            ant.push_history();
        }
        assert_eq!(ant.recent_positions.len(), 20);
        assert_eq!(ant.recent_positions.back(), Some(&GridPos::new(49, 0)));
    }

    #[test]
    fn test_record_success_tracks_preferences() {
        let mut ant = ant();
        ant.record_success(TaskKind::CollectFood, 3);
        ant.record_success(TaskKind::DigTunnel, 3);
        ant.record_success(TaskKind::CollectFood, 3);
        assert_eq!(ant.experience, 3);
        assert_eq!(
            ant.preferred_tasks,
            vec![TaskKind::CollectFood, TaskKind::DigTunnel]
        );
    }

    #[test]
    fn test_remember_scores_and_locates() {
        let mut ant = ant();
        ant.remember("Collected 3 food at 5,5", MemoryKind::TaskSuccess, SystemTime::UNIX_EPOCH);
        let m = ant.memories.iter().next().unwrap();
        assert!((m.importance - 0.8).abs() < 1e-6);
        assert_eq!(m.location, GridPos::new(5, 5));
    }
}
