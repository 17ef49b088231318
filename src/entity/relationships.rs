//! Per-ant relationship map, keyed by peer id

use crate::core::types::AntId;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub peer: AntId,
    /// Bond strength in [0, max]
    pub strength: f32,
    pub interaction_count: u32,
    pub last_interaction_at: SystemTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipMap {
    relationships: AHashMap<AntId, Relationship>,
}

impl RelationshipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-or-update the bond with `peer`
    pub fn strengthen(&mut self, peer: AntId, increment: f32, max: f32, now: SystemTime) {
        let rel = self.relationships.entry(peer).or_insert_with(|| Relationship {
            peer,
            strength: 0.0,
            interaction_count: 0,
            last_interaction_at: now,
        });
        rel.strength = (rel.strength + increment).min(max);
        rel.interaction_count += 1;
        rel.last_interaction_at = now;
    }

    pub fn get(&self, peer: AntId) -> Option<&Relationship> {
        self.relationships.get(&peer)
    }

    pub fn strength_with(&self, peer: AntId) -> f32 {
        self.get(peer).map(|r| r.strength).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Relationships sorted by peer id
    pub fn sorted(&self) -> Vec<&Relationship> {
        let mut all: Vec<_> = self.relationships.values().collect();
        all.sort_by_key(|r| r.peer);
        all
    }
}
