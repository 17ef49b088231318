//! Agent state machine: one update per living ant per tick
//!
//! Order within an update:
//! 1. metabolism (age, energy upkeep, death)
//! 2. decision cooldown, and a policy decision when it runs out
//! 3. the current task's behaviour, exactly once
//! 4. bookkeeping: movement history, scent charge decay, memory ageing

use crate::core::config::SimulationConfig;
use crate::core::types::Tick;
use crate::ecs::world::Colony;
use crate::entity::ant::Ant;
use crate::entity::memory::MemoryKind;
use crate::entity::tasks::TaskKind;
use crate::simulation::decision::{AntState, DecisionPolicy};
use crate::simulation::movement::move_toward_target;
use crate::simulation::perception::{
    dig_site, gather_context, nearest_food, nearest_helpable_peer, nearest_peer, nearest_tunnel,
    Peers,
};
use crate::simulation::tick::SimulationEvent;
use crate::world::field::FieldGrid;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, SystemTime};

/// Everything an ant update may read or mutate besides the ants themselves
pub struct TickEnv<'a> {
    pub config: &'a SimulationConfig,
    pub grid: &'a mut FieldGrid,
    pub colony: &'a mut Colony,
    pub rng: &'a mut ChaCha8Rng,
    /// Wall clock for this tick
    pub now: SystemTime,
    pub tick: Tick,
    pub events: &'a mut Vec<SimulationEvent>,
}

/// Snapshot of an ant for the decision policy
pub fn ant_state(ant: &Ant, config: &SimulationConfig) -> AntState {
    AntState {
        energy: ant.energy,
        max_energy: ant.max_energy,
        carried_food: ant.carried_food,
        carrying_capacity: config.carrying_capacity,
        current_task: ant.current_task,
        recent_memories: ant.memories.recent_contents(config.recent_memory_digest),
    }
}

/// Run one tick for `ant`
pub fn update_ant(
    env: &mut TickEnv<'_>,
    ant: &mut Ant,
    peers: &mut Peers<'_>,
    policy: &mut dyn DecisionPolicy,
) {
    if !ant.metabolize(env.config.energy_decay) {
        return;
    }

    update_decision(env, ant, peers, policy);
    execute_task(env, ant, peers);

    ant.push_history();
    ant.pheromone_strength *= env.config.pheromone_decay;
    ant.memories.age_all(
        env.now,
        Duration::from_secs_f32(env.config.memory_horizon_secs),
        env.config.memory_importance_floor,
    );
}

fn update_decision(
    env: &mut TickEnv<'_>,
    ant: &mut Ant,
    peers: &Peers<'_>,
    policy: &mut dyn DecisionPolicy,
) {
    ant.decision_cooldown -= 1;
    if ant.decision_cooldown > 0 {
        return;
    }

    let context = gather_context(env.grid, ant, peers, env.config.vision_radius);
    let state = ant_state(ant, env.config);
    let task = policy.decide(&state, &context);

    let previous = ant.current_task;
    if ant.switch_task(task) {
        tracing::debug!(ant = %ant.id, from = %previous, to = %task, "Task changed");
        env.events.push(SimulationEvent::TaskChanged {
            ant: ant.id,
            from: previous,
            to: task,
            tick: env.tick,
        });
    }

    let jitter = env.config.decision_cooldown_jitter.max(0);
    ant.decision_cooldown = env.config.decision_cooldown_base + env.rng.gen_range(-jitter..=jitter);
}

/// Dispatch the current task's behaviour
pub fn execute_task(env: &mut TickEnv<'_>, ant: &mut Ant, peers: &mut Peers<'_>) {
    match ant.current_task {
        TaskKind::Explore => explore(env, ant),
        TaskKind::MoveToFood => move_to_food(env, ant),
        TaskKind::CollectFood => collect_food(env, ant),
        TaskKind::ReturnHome => return_home(env, ant),
        TaskKind::DigTunnel => dig_tunnel(env, ant),
        TaskKind::FollowAnt => follow_ant(env, ant, peers),
        TaskKind::Rest => rest(env, ant),
        TaskKind::HelpAnt => help_ant(env, ant, peers),
    }
}

fn explore(env: &mut TickEnv<'_>, ant: &mut Ant) {
    if ant.target.is_none() {
        let angle = env.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = env
            .rng
            .gen_range(env.config.explore_distance_min..=env.config.explore_distance_max)
            as f32;
        ant.target = Some(ant.position.offset(
            (distance * angle.cos()) as i32,
            (distance * angle.sin()) as i32,
        ));
    }

    move_toward_target(ant, env.grid);

    if ant.reached_target() || ant.stuck_counter > env.config.stuck_threshold {
        ant.target = None;
        ant.stuck_counter = 0;
    }
}

fn move_to_food(env: &mut TickEnv<'_>, ant: &mut Ant) {
    match nearest_food(env.grid, ant.position, env.config.vision_radius) {
        Some(food) => {
            ant.target = Some(food);
            move_toward_target(ant, env.grid);
        }
        None => {
            ant.switch_task(TaskKind::Explore);
        }
    }
}

fn collect_food(env: &mut TickEnv<'_>, ant: &mut Ant) {
    let here = ant.position;
    let available = env.grid.food_at(here.x, here.y);
    let room = env.config.carrying_capacity - ant.carried_food;

    if available <= 0.0 || room <= 0.0 {
        ant.switch_task(TaskKind::Explore);
        return;
    }

    let taken = env.grid.take_food(here.x, here.y, room);
    ant.carried_food = (ant.carried_food + taken).min(env.config.carrying_capacity);
    ant.remember(
        format!("Collected {:.1} food at {}", taken, here),
        MemoryKind::TaskSuccess,
        env.now,
    );
    ant.record_success(TaskKind::CollectFood, env.config.preferred_task_limit);
    env.events.push(SimulationEvent::FoodCollected {
        ant: ant.id,
        amount: taken,
        at: here,
    });
    ant.switch_task(TaskKind::ReturnHome);
}

fn return_home(env: &mut TickEnv<'_>, ant: &mut Ant) {
    let Some(tunnel) = nearest_tunnel(env.grid, ant.position, env.config.vision_radius) else {
        ant.switch_task(TaskKind::DigTunnel);
        return;
    };

    ant.target = Some(tunnel);
    move_toward_target(ant, env.grid);

    let here = ant.position;
    if env.grid.is_tunnel(here.x, here.y) && ant.is_carrying() {
        let amount = ant.carried_food;
        env.colony.deposit(amount);
        ant.carried_food = 0.0;
        ant.remember(
            format!("Delivered {:.1} food to colony at {}", amount, here),
            MemoryKind::TaskSuccess,
            env.now,
        );
        ant.record_success(TaskKind::ReturnHome, env.config.preferred_task_limit);
        tracing::debug!(ant = %ant.id, amount, storage = env.colony.food_storage, "Food delivered");
        env.events.push(SimulationEvent::FoodDelivered { ant: ant.id, amount });
        ant.switch_task(TaskKind::Explore);
    }
}

fn dig_tunnel(env: &mut TickEnv<'_>, ant: &mut Ant) {
    let cost = env.config.dig_energy_cost;
    let site = dig_site(env.grid, ant.position);

    let Some(site) = site.filter(|_| ant.energy >= cost) else {
        ant.switch_task(TaskKind::Rest);
        return;
    };

    if !env.grid.dig_tunnel(site.x, site.y) {
        ant.switch_task(TaskKind::Rest);
        return;
    }

    ant.spend_energy(cost);
    if site != ant.position {
        ant.relocate(site);
    }
    ant.remember(format!("Dug tunnel at {}", site), MemoryKind::TaskSuccess, env.now);
    ant.record_success(TaskKind::DigTunnel, env.config.preferred_task_limit);
    env.events.push(SimulationEvent::TunnelDug { ant: ant.id, at: site });
    ant.switch_task(TaskKind::Explore);
}

fn follow_ant(env: &mut TickEnv<'_>, ant: &mut Ant, peers: &mut Peers<'_>) {
    let vision = env.config.vision_radius as f32;
    let Some((peer_id, peer_pos)) = nearest_peer(peers, ant.position, vision) else {
        ant.switch_task(TaskKind::Explore);
        return;
    };

    ant.target = Some(peer_pos);
    move_toward_target(ant, env.grid);

    if ant.position.distance(&peer_pos) > env.config.interaction_distance {
        return;
    }
    let Some(peer) = peers.get_mut(peer_id) else {
        return;
    };

    ant.strengthen_relationship(peer.id, env.config, env.now);
    peer.strengthen_relationship(ant.id, env.config, env.now);

    if !peer.memories.is_full() {
        let shared = ant
            .memories
            .choose(&mut *env.rng)
            .map(|m| (m.content.clone(), m.importance));
        if let Some((content, importance)) = shared {
            peer.remember_with_importance(
                format!("Learned from ant {}: {}", ant.id, content),
                MemoryKind::SocialInteraction,
                importance * env.config.shared_memory_discount,
                env.now,
            );
        }
    }

    env.events.push(SimulationEvent::AntsMet {
        ant: ant.id,
        peer: peer_id,
    });
}

fn rest(env: &mut TickEnv<'_>, ant: &mut Ant) {
    ant.gain_energy(env.config.rest_recovery);
    if ant.energy >= ant.max_energy * env.config.rest_exit_ratio {
        ant.switch_task(TaskKind::Explore);
    }
}

fn help_ant(env: &mut TickEnv<'_>, ant: &mut Ant, peers: &mut Peers<'_>) {
    let vision = env.config.vision_radius as f32;
    let Some((target_id, target_pos)) = nearest_helpable_peer(peers, ant.position, vision) else {
        ant.switch_task(TaskKind::Explore);
        return;
    };

    ant.target = Some(target_pos);
    move_toward_target(ant, env.grid);

    if ant.position.distance(&target_pos) > env.config.help_distance {
        return;
    }
    let Some(target) = peers.get_mut(target_id) else {
        return;
    };

    let cost = env.config.dig_energy_cost;
    if target.current_task == TaskKind::DigTunnel && ant.energy >= cost {
        ant.spend_energy(cost);
        target.gain_energy(env.config.help_energy_transfer);
        ant.strengthen_relationship(target_id, env.config, env.now);
        env.events.push(SimulationEvent::AntHelped {
            helper: ant.id,
            target: target_id,
        });
    }
}
