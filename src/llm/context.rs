//! Decision request sent to the oracle
//!
//! This module flattens an ant's state and its surroundings into the
//! request the oracle sees, and renders it as a prompt. The wording of the
//! prompt is incidental; the fields are the contract.

use crate::entity::tasks::TaskKind;
use crate::simulation::decision::{AntState, WorldContext};
use serde::Serialize;

/// Everything the oracle is told about one decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OracleRequest {
    pub energy: f32,
    pub max_energy: f32,
    pub carried_food: f32,
    pub carrying_capacity: f32,
    pub current_task: TaskKind,
    pub recent_memories: Vec<String>,
    pub near_food: bool,
    pub near_home: bool,
    pub near_agent_count: usize,
    pub can_dig_here: bool,
}

impl OracleRequest {
    pub fn new(state: &AntState, context: &WorldContext) -> Self {
        Self {
            energy: state.energy,
            max_energy: state.max_energy,
            carried_food: state.carried_food,
            carrying_capacity: state.carrying_capacity,
            current_task: state.current_task,
            recent_memories: state.recent_memories.clone(),
            near_food: context.near_food,
            near_home: context.near_home,
            near_agent_count: context.near_agent_count,
            can_dig_here: context.can_dig_here,
        }
    }

    /// Render the request as the user half of a prompt
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("Current status:\n");
        s.push_str(&format!("- Energy: {:.0}/{:.0}\n", self.energy, self.max_energy));
        s.push_str(&format!(
            "- Carrying food: {}/{}\n",
            self.carried_food, self.carrying_capacity
        ));
        s.push_str(&format!("- Current task: {}\n", self.current_task));

        let memories = if self.recent_memories.is_empty() {
            "no recent memories".to_string()
        } else {
            let start = self.recent_memories.len().saturating_sub(3);
            self.recent_memories[start..].join(", ")
        };
        s.push_str(&format!("- Recent memories: {}\n", memories));

        s.push_str("\nEnvironment:\n");
        s.push_str(&format!("- Food nearby: {}\n", self.near_food));
        s.push_str(&format!("- Home/tunnel nearby: {}\n", self.near_home));
        s.push_str(&format!("- Other ants nearby: {}\n", self.near_agent_count));
        s.push_str(&format!("- Can dig tunnel here: {}\n", self.can_dig_here));

        s.push_str("\nWhat should you do? Choose ONE action:\n");
        let labels: Vec<_> = TaskKind::ALL.iter().map(|t| t.label()).collect();
        s.push_str(&labels.join(", "));
        s.push_str("\n\nAction:");
        s
    }
}

/// System prompt for task selection
pub const DECISION_SYSTEM_PROMPT: &str = "You are an ant in a colony. Your goal is survival \
and helping the colony thrive. Answer with exactly one action name and nothing else.";
