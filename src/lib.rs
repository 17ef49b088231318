//! Anthill - ant colony foraging simulation
//!
//! Ants wander a side-on slice of earth, gather surface food, dig tunnels
//! and socialise. Each ant picks its next task through a pluggable
//! [`simulation::DecisionPolicy`]: a fixed rule table, or an external LLM
//! oracle that is cached, rate limited and backed by the rule table.

pub mod core;
pub mod ecs;
pub mod entity;
pub mod llm;
pub mod simulation;
pub mod spatial;
pub mod world;
