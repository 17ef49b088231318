//! Per-ant memory log
//!
//! Memories carry an importance that fades with wall-clock age toward a
//! floor. The log is bounded: once it overflows, the least important
//! entries are dropped.

use crate::core::types::GridPos;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// What a memory is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    FoodLocation,
    Danger,
    SocialInteraction,
    TaskSuccess,
    PathLearned,
    Inherited,
}

impl MemoryKind {
    /// Starting importance before content adjustments
    pub fn base_importance(&self) -> f32 {
        match self {
            MemoryKind::FoodLocation => 0.8,
            MemoryKind::Danger => 0.9,
            MemoryKind::SocialInteraction => 0.6,
            MemoryKind::TaskSuccess => 0.7,
            MemoryKind::PathLearned => 0.5,
            MemoryKind::Inherited => 0.5,
        }
    }
}

/// Importance of a fresh memory from its kind and wording
///
/// Mentions of food add 0.1, mentions of danger or threats add 0.2.
pub fn score_importance(content: &str, kind: MemoryKind) -> f32 {
    let lower = content.to_lowercase();
    let mut importance = kind.base_importance();

    if lower.contains("food") {
        importance += 0.1;
    }
    if lower.contains("danger") || lower.contains("threat") {
        importance += 0.2;
    }

    importance.min(1.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub content: String,
    pub kind: MemoryKind,
    /// Importance at creation
    pub base_importance: f32,
    /// Importance after ageing, in [0, 1]
    pub importance: f32,
    pub created_at: SystemTime,
    pub location: GridPos,
}

impl Memory {
    pub fn new(
        content: impl Into<String>,
        kind: MemoryKind,
        importance: f32,
        created_at: SystemTime,
        location: GridPos,
    ) -> Self {
        let importance = importance.clamp(0.0, 1.0);
        Self {
            content: content.into(),
            kind,
            base_importance: importance,
            importance,
            created_at,
            location,
        }
    }

    /// Recompute importance for the wall-clock age at `now`
    ///
    /// Linear fade over `horizon`, never below `floor` of the base value.
    /// Depends only on elapsed time, so calling it more or less often does
    /// not change the result.
    pub fn apply_age(&mut self, now: SystemTime, horizon: Duration, floor: f32) {
        let elapsed = now
            .duration_since(self.created_at)
            .unwrap_or(Duration::ZERO)
            .as_secs_f32();
        let horizon = horizon.as_secs_f32().max(f32::EPSILON);
        let factor = (1.0 - elapsed / horizon).max(floor);
        self.importance = self.base_importance * factor;
    }
}

/// Bounded memory store owned by one ant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLog {
    entries: Vec<Memory>,
    capacity: usize,
}

impl MemoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Append; on overflow keep only the `capacity` most important
    ///
    /// The survivors end up ordered by ascending importance, with ties in
    /// their previous order.
    pub fn add(&mut self, memory: Memory) {
        self.entries.push(memory);

        if self.entries.len() > self.capacity {
            self.entries.sort_by(|a, b| {
                a.importance
                    .partial_cmp(&b.importance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Memory> {
        self.entries.iter()
    }

    /// Contents of the last `n` entries, oldest first
    pub fn recent_contents(&self, n: usize) -> Vec<String> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].iter().map(|m| m.content.clone()).collect()
    }

    pub fn age_all(&mut self, now: SystemTime, horizon: Duration, floor: f32) {
        for memory in &mut self.entries {
            memory.apply_age(now, horizon, floor);
        }
    }

    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<&Memory> {
        self.entries.choose(rng)
    }

    /// Up to `amount` distinct memories chosen at random
    pub fn sample<R: Rng>(&self, rng: &mut R, amount: usize) -> Vec<&Memory> {
        self.entries.choose_multiple(rng, amount).collect()
    }
}
