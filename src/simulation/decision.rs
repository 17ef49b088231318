//! Decision policies: choosing an ant's next task
//!
//! Two interchangeable strategies sit behind [`DecisionPolicy`]:
//! - [`FallbackPolicy`]: a pure rule table, always available
//! - [`OraclePolicy`]: asks an external [`DecisionOracle`], with a response
//!   cache, a minimum spacing between calls, and the rule table as the
//!   answer whenever the oracle is throttled, slow, or broken
//!
//! The simulation receives its policy by injection, so tests can run the
//! rule table alone or drive the oracle path with mocks.

use crate::core::config::SimulationConfig;
use crate::entity::tasks::TaskKind;
use crate::llm::context::OracleRequest;
use crate::llm::oracle::DecisionOracle;
use crate::llm::parser::match_task;
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::time::{Duration, Instant};

/// What an ant knows about itself when deciding
#[derive(Debug, Clone, PartialEq)]
pub struct AntState {
    pub energy: f32,
    pub max_energy: f32,
    pub carried_food: f32,
    pub carrying_capacity: f32,
    pub current_task: TaskKind,
    /// Contents of the most recent memories, oldest first
    pub recent_memories: Vec<String>,
}

/// What an ant perceives within its vision window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldContext {
    pub near_food: bool,
    pub near_home: bool,
    pub near_agent_count: usize,
    pub can_dig_here: bool,
}

/// Counters describing how decisions were reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PolicyStats {
    pub decisions: u64,
    pub oracle_calls: u64,
    pub cache_hits: u64,
    pub rate_limited: u64,
    pub failures: u64,
    pub unrecognized: u64,
}

/// Maps an ant's state and surroundings to a task
pub trait DecisionPolicy {
    fn decide(&mut self, state: &AntState, context: &WorldContext) -> TaskKind;

    fn name(&self) -> &'static str;

    fn stats(&self) -> PolicyStats {
        PolicyStats::default()
    }
}

/// Deterministic rule table
///
/// 1. Low energy: rest if home is in sight, otherwise head home
/// 2. Carrying anything: head home
/// 3. Food in sight: collect it
/// 4. Otherwise explore
#[derive(Debug, Clone, Copy)]
pub struct FallbackPolicy {
    pub low_energy_threshold: f32,
    decisions: u64,
}

impl FallbackPolicy {
    pub fn new(low_energy_threshold: f32) -> Self {
        Self {
            low_energy_threshold,
            decisions: 0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.low_energy_threshold)
    }

    /// The rule table itself; pure
    pub fn choose(&self, state: &AntState, context: &WorldContext) -> TaskKind {
        if state.energy < self.low_energy_threshold {
            return if context.near_home {
                TaskKind::Rest
            } else {
                TaskKind::ReturnHome
            };
        }

        if state.carried_food > 0.0 {
            return TaskKind::ReturnHome;
        }

        if context.near_food {
            return TaskKind::CollectFood;
        }

        TaskKind::Explore
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(SimulationConfig::default().low_energy_threshold)
    }
}

impl DecisionPolicy for FallbackPolicy {
    fn decide(&mut self, state: &AntState, context: &WorldContext) -> TaskKind {
        self.decisions += 1;
        self.choose(state, context)
    }

    fn name(&self) -> &'static str {
        "fallback"
    }

    fn stats(&self) -> PolicyStats {
        PolicyStats {
            decisions: self.decisions,
            ..PolicyStats::default()
        }
    }
}

/// Coarse fingerprint of a decision situation
///
/// Energy is bucketed by tens so nearby states share an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    pub energy_bucket: i32,
    pub carried_food: OrderedFloat<f32>,
    pub near_food: bool,
    pub near_home: bool,
    pub current_task: TaskKind,
}

impl DecisionKey {
    pub fn new(state: &AntState, context: &WorldContext) -> Self {
        Self {
            energy_bucket: (state.energy / 10.0).floor() as i32,
            carried_food: OrderedFloat(state.carried_food),
            near_food: context.near_food,
            near_home: context.near_home,
            current_task: state.current_task,
        }
    }
}

/// Bounded answer cache, emptied wholesale when full
#[derive(Debug, Clone)]
pub struct DecisionCache {
    entries: AHashMap<DecisionKey, TaskKind>,
    capacity: usize,
}

impl DecisionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: AHashMap::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &DecisionKey) -> Option<TaskKind> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: DecisionKey, task: TaskKind) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.entries.clear();
        }
        self.entries.insert(key, task);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Admits at most one call per `min_interval`; never blocks
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Claim the slot at `now` if the interval has elapsed
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_call {
            if now.saturating_duration_since(last) < self.min_interval {
                return false;
            }
        }
        self.last_call = Some(now);
        true
    }
}

/// Policy that consults an external oracle
///
/// Order of resolution for one decision:
/// 1. cached answer for the same [`DecisionKey`]
/// 2. rule table, if the rate limiter refuses a call
/// 3. oracle answer, validated against the vocabulary (unknown -> Explore)
///    and cached
/// 4. rule table, if the oracle errored or timed out
pub struct OraclePolicy {
    oracle: Box<dyn DecisionOracle>,
    fallback: FallbackPolicy,
    cache: DecisionCache,
    limiter: RateLimiter,
    stats: PolicyStats,
}

impl OraclePolicy {
    pub fn new(oracle: Box<dyn DecisionOracle>, config: &SimulationConfig) -> Self {
        Self {
            oracle,
            fallback: FallbackPolicy::from_config(config),
            cache: DecisionCache::new(config.oracle_cache_capacity),
            limiter: RateLimiter::new(config.oracle_min_interval()),
            stats: PolicyStats::default(),
        }
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// Decide as if the wall clock read `now`
    pub fn decide_at(&mut self, state: &AntState, context: &WorldContext, now: Instant) -> TaskKind {
        self.stats.decisions += 1;
        let key = DecisionKey::new(state, context);

        if let Some(task) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            return task;
        }

        if !self.limiter.try_acquire(now) {
            self.stats.rate_limited += 1;
            return self.fallback.choose(state, context);
        }

        self.stats.oracle_calls += 1;
        let request = OracleRequest::new(state, context);
        match self.oracle.query(&request) {
            Ok(raw) => {
                let task = match match_task(&raw) {
                    Some(task) => task,
                    None => {
                        self.stats.unrecognized += 1;
                        tracing::debug!(response = %raw.trim(), "Unrecognized oracle answer, exploring");
                        TaskKind::Explore
                    }
                };
                self.cache.insert(key, task);
                task
            }
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(error = %e, "Oracle decision failed, using fallback");
                self.fallback.choose(state, context)
            }
        }
    }
}

impl DecisionPolicy for OraclePolicy {
    fn decide(&mut self, state: &AntState, context: &WorldContext) -> TaskKind {
        self.decide_at(state, context, Instant::now())
    }

    fn name(&self) -> &'static str {
        "oracle"
    }

    fn stats(&self) -> PolicyStats {
        self.stats
    }
}
