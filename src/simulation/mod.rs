pub mod behavior;
pub mod decision;
pub mod movement;
pub mod perception;
pub mod population;
pub mod stats;
pub mod tick;

pub use decision::{
    AntState, DecisionPolicy, FallbackPolicy, OraclePolicy, PolicyStats, WorldContext,
};
pub use stats::{AntSnapshot, WorldStats};
pub use tick::{run_simulation_tick, run_simulation_tick_at, SimulationEvent};
