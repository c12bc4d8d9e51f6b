#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous navigation for enemies.
//!
//! Enemies never plan whole paths. Each time an enemy is ready to step, its
//! controller answers a single question using grid adjacency lookups only:
//! which direction should be requested next. The movement engine then
//! validates the request exactly like it validates player input.

use std::collections::BTreeMap;

use labyrinth_core::{
    ActorId, ActorSnapshot, Command, Coordinate, Direction, Event, Grid, RandomSource,
};
use tracing::info;

const DEFAULT_PURSUIT_THRESHOLD: u32 = 20;

/// Heuristic used to pick an enemy's next direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationPolicy {
    /// Uniformly random cardinal direction, independent of walls.
    Wander,
    /// Right-hand-rule wall following.
    WallFollow,
    /// Greedy pursuit of the target, falling back to wall following.
    Pursuit,
}

/// Reports whether the cell `distance` steps from `origin` toward `direction` blocks.
///
/// [`Direction::Invalid`] and lookups leaving the grid always block.
#[must_use]
pub fn is_blocked(grid: &Grid, origin: Coordinate, direction: Direction, distance: u32) -> bool {
    origin
        .offset(direction, distance)
        .map_or(true, |neighbour| grid.is_blocked(neighbour))
}

/// Per-enemy decision state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationController {
    previous: Direction,
}

impl NavigationController {
    /// Creates a controller with no remembered direction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous: Direction::Invalid,
        }
    }

    /// Direction most recently chosen by the right-hand rule.
    #[must_use]
    pub const fn previous(&self) -> Direction {
        self.previous
    }

    /// Picks a uniformly random cardinal direction.
    pub fn wander<R>(&mut self, random: &mut R) -> Direction
    where
        R: RandomSource + ?Sized,
    {
        let index = random.next_int(0, 4);
        usize::try_from(index)
            .ok()
            .and_then(|index| Direction::CARDINALS.get(index).copied())
            .unwrap_or(Direction::Invalid)
    }

    /// Applies the right-hand rule: right, straight, left, then back.
    pub fn follow_wall(&mut self, grid: &Grid, origin: Coordinate, facing: Direction) -> Direction {
        let chosen = [
            facing.turn_right(),
            facing,
            facing.turn_left(),
            facing.opposite(),
        ]
        .into_iter()
        .find(|direction| !is_blocked(grid, origin, *direction, 1))
        .unwrap_or(Direction::Invalid);
        self.previous = chosen;
        chosen
    }

    /// Moves toward `target` when the greedy direction is open, otherwise follows the wall.
    ///
    /// The greedy direction is skipped when it repeats the last wall-following
    /// choice, which keeps an enemy from bouncing between two cells.
    pub fn pursue(
        &mut self,
        grid: &Grid,
        origin: Coordinate,
        facing: Direction,
        target: Coordinate,
    ) -> Direction {
        let effective = effective_direction(grid, origin, target);
        if !is_blocked(grid, origin, effective, 1) && effective != self.previous {
            self.previous = Direction::Invalid;
            return effective;
        }
        self.follow_wall(grid, origin, facing)
    }

    /// Chooses the next requested direction under `policy`.
    ///
    /// Pursuit without a target degrades to wall following.
    pub fn decide<R>(
        &mut self,
        policy: NavigationPolicy,
        grid: &Grid,
        enemy: &ActorSnapshot,
        target: Option<Coordinate>,
        random: &mut R,
    ) -> Direction
    where
        R: RandomSource + ?Sized,
    {
        match (policy, target) {
            (NavigationPolicy::Wander, _) => self.wander(random),
            (NavigationPolicy::Pursuit, Some(target)) => {
                self.pursue(grid, enemy.coordinate, enemy.facing, target)
            }
            (NavigationPolicy::WallFollow, _) | (NavigationPolicy::Pursuit, None) => {
                self.follow_wall(grid, enemy.coordinate, enemy.facing)
            }
        }
    }
}

/// Greedy axis toward `target` that is not immediately walled off.
///
/// Walks both candidate axes outward in lockstep. The first axis to hit a
/// wall loses, so the other axis wins. Returns [`Direction::Invalid`] if
/// neither axis hits a wall within the larger grid dimension.
#[must_use]
pub fn effective_direction(grid: &Grid, origin: Coordinate, target: Coordinate) -> Direction {
    let vertical = match target.y().cmp(&origin.y()) {
        std::cmp::Ordering::Greater => Direction::North,
        std::cmp::Ordering::Less => Direction::South,
        std::cmp::Ordering::Equal => Direction::Invalid,
    };
    let horizontal = match target.x().cmp(&origin.x()) {
        std::cmp::Ordering::Greater => Direction::East,
        std::cmp::Ordering::Less => Direction::West,
        std::cmp::Ordering::Equal => Direction::Invalid,
    };

    let bound = grid.width().max(grid.height());
    for distance in 0..=bound {
        if is_blocked(grid, origin, vertical, distance) {
            return horizontal;
        }
        if is_blocked(grid, origin, horizontal, distance) {
            return vertical;
        }
    }
    Direction::Invalid
}

/// Configuration parameters required to construct the navigation system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pursuit_threshold: Option<u32>,
}

impl Config {
    /// Creates a configuration switching to pursuit once `pursuit_threshold`
    /// coins were collected. `None` keeps enemies wandering forever.
    #[must_use]
    pub const fn new(pursuit_threshold: Option<u32>) -> Self {
        Self { pursuit_threshold }
    }

    /// Coins required before enemies start pursuing the player.
    #[must_use]
    pub const fn pursuit_threshold(&self) -> Option<u32> {
        self.pursuit_threshold
    }

    /// Policy applied to enemies without an override.
    #[must_use]
    pub fn scheduled_policy(&self, coins_collected: u32) -> NavigationPolicy {
        match self.pursuit_threshold {
            Some(threshold) if coins_collected >= threshold => NavigationPolicy::Pursuit,
            _ => NavigationPolicy::Wander,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Some(DEFAULT_PURSUIT_THRESHOLD))
    }
}

/// Pure system that emits direction requests for ready enemies.
#[derive(Debug)]
pub struct Navigation {
    config: Config,
    controllers: BTreeMap<ActorId, NavigationController>,
    overrides: BTreeMap<ActorId, NavigationPolicy>,
    scheduled: Option<NavigationPolicy>,
    halted: bool,
}

impl Navigation {
    /// Creates a new navigation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            controllers: BTreeMap::new(),
            overrides: BTreeMap::new(),
            scheduled: None,
            halted: false,
        }
    }

    /// Pins `actor` to `policy`, or returns it to the schedule with `None`.
    pub fn set_override(&mut self, actor: ActorId, policy: Option<NavigationPolicy>) {
        let _ = match policy {
            Some(policy) => self.overrides.insert(actor, policy),
            None => self.overrides.remove(&actor),
        };
    }

    /// Policy that drives `actor` given the collected coin count.
    #[must_use]
    pub fn policy_for(&self, actor: ActorId, coins_collected: u32) -> NavigationPolicy {
        self.overrides
            .get(&actor)
            .copied()
            .unwrap_or_else(|| self.config.scheduled_policy(coins_collected))
    }

    /// Controller currently assigned to `actor`.
    #[must_use]
    pub fn controller(&self, actor: ActorId) -> Option<&NavigationController> {
        self.controllers.get(&actor)
    }

    /// Consumes world events and enemy snapshots to emit direction requests.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        enemies: &[ActorSnapshot],
        grid: &Grid,
        target: Option<Coordinate>,
        coins_collected: u32,
        random: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        let mut time_advanced = false;
        for event in events {
            match event {
                Event::MazeLoaded { .. } => {
                    self.controllers.clear();
                    self.overrides.clear();
                    self.scheduled = None;
                    self.halted = false;
                }
                Event::ActorDespawned { actor, .. } => {
                    let _ = self.controllers.remove(actor);
                    let _ = self.overrides.remove(actor);
                }
                Event::GameOver { .. } => self.halted = true,
                Event::TimeAdvanced { .. } => time_advanced = true,
                _ => {}
            }
        }

        if self.halted || !time_advanced {
            return;
        }

        let scheduled = self.config.scheduled_policy(coins_collected);
        if self.scheduled != Some(scheduled) {
            info!(policy = ?scheduled, coins = coins_collected, "enemy navigation policy");
            self.scheduled = Some(scheduled);
        }

        for enemy in enemies {
            if !enemy.kind.is_enemy() || !enemy.phase.is_ready() {
                continue;
            }
            let policy = self.policy_for(enemy.id, coins_collected);
            let controller = self.controllers.entry(enemy.id).or_default();
            let direction = controller.decide(policy, grid, enemy, target, random);
            if direction.is_valid() {
                out.push(Command::RequestDirection {
                    actor: enemy.id,
                    direction,
                });
            }
        }
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
