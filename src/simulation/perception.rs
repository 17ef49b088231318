//! Perception: what an ant notices inside its square vision window
//!
//! Every nearest-X search scans candidates in a fixed order and only
//! replaces the current best on a strictly smaller distance, so the first
//! candidate at the minimal distance wins. Cell scans run x-outer, y-inner.

use crate::core::types::{AntId, GridPos};
use crate::entity::ant::Ant;
use crate::entity::tasks::TaskKind;
use crate::simulation::decision::WorldContext;
use crate::world::field::FieldGrid;

/// Every other ant in the population, seen from the one being updated
///
/// The population is split around the current ant so the others can be
/// read and mutated while it is borrowed. Iteration follows population
/// order and skips dead ants.
pub struct Peers<'a> {
    before: &'a mut [Ant],
    after: &'a mut [Ant],
}

impl<'a> Peers<'a> {
    pub fn new(before: &'a mut [Ant], after: &'a mut [Ant]) -> Self {
        Self { before, after }
    }

    /// No other ants
    pub fn none() -> Peers<'static> {
        Peers {
            before: &mut [],
            after: &mut [],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ant> + '_ {
        self.before
            .iter()
            .chain(self.after.iter())
            .filter(|ant| ant.alive)
    }

    pub fn get(&self, id: AntId) -> Option<&Ant> {
        self.iter().find(|ant| ant.id == id)
    }

    pub fn get_mut(&mut self, id: AntId) -> Option<&mut Ant> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find(|ant| ant.alive && ant.id == id)
    }
}

/// Cells of the vision window around `center`, clipped to the grid
fn window_cells(grid: &FieldGrid, center: GridPos, radius: i32) -> impl Iterator<Item = GridPos> {
    let x_range = (center.x - radius).max(0)..(center.x + radius + 1).min(grid.width() as i32);
    let y_range = (center.y - radius).max(0)..(center.y + radius + 1).min(grid.height() as i32);
    x_range.flat_map(move |x| y_range.clone().map(move |y| GridPos::new(x, y)))
}

fn nearest_cell(
    grid: &FieldGrid,
    origin: GridPos,
    radius: i32,
    matches: impl Fn(&FieldGrid, GridPos) -> bool,
) -> Option<GridPos> {
    let mut best: Option<(GridPos, f32)> = None;
    for cell in window_cells(grid, origin, radius) {
        if !matches(grid, cell) {
            continue;
        }
        let distance = origin.distance(&cell);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((cell, distance));
        }
    }
    best.map(|(cell, _)| cell)
}

/// Nearest cell holding any food
pub fn nearest_food(grid: &FieldGrid, origin: GridPos, radius: i32) -> Option<GridPos> {
    nearest_cell(grid, origin, radius, |g, c| g.food_at(c.x, c.y) > 0.0)
}

/// Nearest tunnel cell
pub fn nearest_tunnel(grid: &FieldGrid, origin: GridPos, radius: i32) -> Option<GridPos> {
    nearest_cell(grid, origin, radius, |g, c| g.is_tunnel(c.x, c.y))
}

/// Nearest living peer within `radius` (Euclidean) that passes `accept`
pub fn nearest_peer_where(
    peers: &Peers<'_>,
    origin: GridPos,
    radius: f32,
    accept: impl Fn(&Ant) -> bool,
) -> Option<(AntId, GridPos)> {
    let mut best: Option<(AntId, GridPos, f32)> = None;
    for peer in peers.iter().filter(|p| accept(p)) {
        let distance = origin.distance(&peer.position);
        if distance > radius {
            continue;
        }
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((peer.id, peer.position, distance));
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}

pub fn nearest_peer(peers: &Peers<'_>, origin: GridPos, radius: f32) -> Option<(AntId, GridPos)> {
    nearest_peer_where(peers, origin, radius, |_| true)
}

/// Nearest peer busy with work a helper can assist
pub fn nearest_helpable_peer(
    peers: &Peers<'_>,
    origin: GridPos,
    radius: f32,
) -> Option<(AntId, GridPos)> {
    nearest_peer_where(peers, origin, radius, |p| {
        matches!(p.current_task, TaskKind::CollectFood | TaskKind::DigTunnel)
    })
}

/// Soil the ant at `pos` could dig right now
///
/// Its own cell if that is soil, otherwise the first soil neighbour in the
/// order below, left, right, above.
pub fn dig_site(grid: &FieldGrid, pos: GridPos) -> Option<GridPos> {
    [(0, 0), (0, 1), (-1, 0), (1, 0), (0, -1)]
        .into_iter()
        .map(|(dx, dy)| pos.offset(dx, dy))
        .find(|cell| grid.can_dig(cell.x, cell.y))
}

/// Summarise the vision window for the decision policy
pub fn gather_context(grid: &FieldGrid, ant: &Ant, peers: &Peers<'_>, radius: i32) -> WorldContext {
    let mut context = WorldContext {
        can_dig_here: dig_site(grid, ant.position).is_some(),
        ..WorldContext::default()
    };

    for cell in window_cells(grid, ant.position, radius) {
        if grid.food_at(cell.x, cell.y) > 0.0 {
            context.near_food = true;
        }
        if grid.is_tunnel(cell.x, cell.y) {
            context.near_home = true;
        }
        if context.near_food && context.near_home {
            break;
        }
    }

    context.near_agent_count = peers
        .iter()
        .filter(|peer| {
            grid.is_in_bounds(peer.position.x, peer.position.y)
                && peer.position.chebyshev(&ant.position) <= radius
        })
        .count();

    context
}
