#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the labyrinth.

mod registry;
mod session;

use labyrinth_core::{
    ActorId, ActorKind, ActorPhase, Command, Coordinate, Direction, Event, Grid, Intersection,
    SpawnRejection, StepRejection, MIN_DIMENSION, WELCOME_BANNER,
};
use tracing::{debug, info};

use registry::ActorRegistry;
pub use session::{GameOutcome, SessionState};

/// Represents the authoritative labyrinth world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    registry: ActorRegistry,
    session: SessionState,
    tick_index: u64,
}

impl World {
    /// Creates an empty world holding an uncarved minimum-size grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(MIN_DIMENSION, MIN_DIMENSION),
            registry: ActorRegistry::default(),
            session: SessionState::new(),
            tick_index: 0,
        }
    }

    fn spawn(&mut self, kind: ActorKind, at: Coordinate, out_events: &mut Vec<Event>) {
        let rejection = if self.session.is_over() {
            Some(SpawnRejection::SessionOver)
        } else if !self.grid.is_path(at) {
            Some(SpawnRejection::NotPath)
        } else if kind == ActorKind::Player && self.registry.watched().is_some() {
            Some(SpawnRejection::PlayerExists)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(%kind, %at, ?reason, "spawn rejected");
            out_events.push(Event::SpawnRejected { kind, at, reason });
            return;
        }

        let actor = self.registry.insert(kind, at);
        debug!(%kind, %at, actor = actor.get(), "actor spawned");
        out_events.push(Event::ActorSpawned {
            actor,
            kind,
            at,
            facing: kind.initial_facing(),
        });
    }

    fn step(
        &mut self,
        actor_id: ActorId,
        to: Coordinate,
        facing: Direction,
        out_events: &mut Vec<Event>,
    ) {
        if let Err(reason) = self.validate_step(actor_id, to) {
            out_events.push(Event::StepRejected {
                actor: actor_id,
                reason,
            });
            return;
        }

        let speed_multiplier = self.session.speed_multiplier();
        let Some(actor) = self.registry.get_mut(actor_id) else {
            return;
        };

        let from = actor.coordinate;
        if from == to {
            actor.facing = facing;
        } else {
            let direction = from.direction_to(to);
            actor.coordinate = to;
            actor.facing = direction;
            actor.phase = actor
                .kind
                .step_interval(speed_multiplier)
                .map_or(ActorPhase::Ready, |remaining| ActorPhase::Animating {
                    remaining,
                });
            out_events.push(Event::ActorAdvanced {
                actor: actor_id,
                kind: actor.kind,
                from,
                to,
                facing: direction,
            });
        }

        let is_watched = self
            .registry
            .watched()
            .is_some_and(|watched| watched.id == actor_id);
        if is_watched {
            self.resolve_intersections(out_events);
        }
    }

    fn validate_step(&self, actor_id: ActorId, to: Coordinate) -> Result<(), StepRejection> {
        if self.session.is_over() {
            return Err(StepRejection::SessionOver);
        }
        let actor = self
            .registry
            .get(actor_id)
            .ok_or(StepRejection::UnknownActor)?;
        if !actor.kind.is_mobile() {
            return Err(StepRejection::Immobile);
        }
        if !actor.phase.is_ready() {
            return Err(StepRejection::NotReady);
        }
        if actor.coordinate == to {
            return Ok(());
        }
        if !actor.coordinate.direction_to(to).is_valid() {
            return Err(StepRejection::NotAdjacent);
        }
        if self.grid.is_blocked(to) {
            return Err(StepRejection::Blocked);
        }
        Ok(())
    }

    /// Resolves every actor sharing the watched actor's cell.
    ///
    /// Works on a snapshot of the registry; collected coins are removed only
    /// after the pass completes. The first game-over outcome ends the pass.
    fn resolve_intersections(&mut self, out_events: &mut Vec<Event>) {
        let Some(watched) = self.registry.watched() else {
            return;
        };
        let (watched_id, at) = (watched.id, watched.coordinate);
        let candidates: Vec<(ActorId, ActorKind, Coordinate)> = self
            .registry
            .iter()
            .filter(|actor| actor.id != watched_id)
            .map(|actor| (actor.id, actor.kind, actor.coordinate))
            .collect();

        let mut collected: Vec<ActorId> = Vec::new();
        for (id, kind, coordinate) in candidates {
            if !coordinate.is_intersecting(at) {
                continue;
            }

            match kind.intersection() {
                Intersection::Ignore => {}
                Intersection::CollectCoin => {
                    let coins_collected = self.session.collect_coin();
                    info!(
                        coins = coins_collected,
                        speed_multiplier = self.session.speed_multiplier(),
                        "coin collected"
                    );
                    collected.push(id);
                    out_events.push(Event::CoinCollected {
                        coin: id,
                        at,
                        coins_collected,
                    });
                }
                Intersection::GameOver | Intersection::GameOverWithScoreReset => {
                    if kind.intersection() == Intersection::GameOverWithScoreReset {
                        self.session.reset_coins();
                    }
                    let outcome = self.session.finish(kind);
                    info!(
                        caught_by = %kind,
                        coins = outcome.coins_collected(),
                        "game over"
                    );
                    out_events.push(Event::GameOver {
                        caught_by: kind,
                        coins_collected: outcome.coins_collected(),
                    });
                    break;
                }
            }
        }

        for id in collected {
            if let Some(removed) = self.registry.remove(id) {
                out_events.push(Event::ActorDespawned {
                    actor: removed.id,
                    kind: removed.kind,
                });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadMaze { grid } => {
            world.registry.clear();
            world.session = SessionState::new();
            world.tick_index = 0;
            let (width, height, path_cells) = (grid.width(), grid.height(), grid.path_count());
            world.grid = grid;
            info!(width, height, path_cells, "maze loaded");
            out_events.push(Event::MazeLoaded {
                width,
                height,
                path_cells,
            });
        }
        Command::SpawnActor { kind, at } => world.spawn(kind, at, out_events),
        Command::DespawnActor { actor } => {
            if let Some(removed) = world.registry.remove(actor) {
                out_events.push(Event::ActorDespawned {
                    actor: removed.id,
                    kind: removed.kind,
                });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            for actor in world.registry.iter_mut() {
                actor.advance_clock(dt);
            }
        }
        Command::RequestDirection { actor, direction } => {
            if !direction.is_valid() || world.session.is_over() {
                return;
            }
            if let Some(actor) = world.registry.get_mut(actor) {
                actor.requested = direction;
            }
        }
        Command::StepActor { actor, to, facing } => world.step(actor, to, facing, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use labyrinth_core::{
        ActorId, ActorKind, ActorSnapshot, ActorView, Coordinate, Grid, GridError, RandomSource,
    };

    use super::{SessionState, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the loaded maze.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Captures a read-only view of every actor in insertion order.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(world.registry.iter().map(|actor| actor.snapshot()).collect())
    }

    /// Snapshot of a single actor.
    #[must_use]
    pub fn actor(world: &World, id: ActorId) -> Option<ActorSnapshot> {
        world.registry.get(id).map(|actor| actor.snapshot())
    }

    /// Snapshot of the watched player.
    #[must_use]
    pub fn player(world: &World) -> Option<ActorSnapshot> {
        world.registry.watched().map(|actor| actor.snapshot())
    }

    /// Provides read-only access to the session counters.
    #[must_use]
    pub fn session(world: &World) -> &SessionState {
        &world.session
    }

    /// Number of live actors of the provided kind.
    #[must_use]
    pub fn live_count(world: &World, kind: ActorKind) -> usize {
        world.registry.count(kind)
    }

    /// Number of live coins.
    #[must_use]
    pub fn live_coin_count(world: &World) -> usize {
        live_count(world, ActorKind::Coin)
    }

    /// Number of live enemies of any kind.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world
            .registry
            .iter()
            .filter(|actor| actor.kind.is_enemy())
            .count()
    }

    /// Every path cell of the loaded maze in row-major order.
    #[must_use]
    pub fn path_coordinates(world: &World) -> Vec<Coordinate> {
        world.grid.path_coordinates()
    }

    /// Draws a uniformly random path cell of the loaded maze.
    pub fn pick_random_path_coordinate<R>(
        world: &World,
        random: &mut R,
    ) -> Result<Coordinate, GridError>
    where
        R: RandomSource + ?Sized,
    {
        world.grid.pick_random_path_coordinate(random)
    }

    /// Number of ticks applied since the maze was loaded.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
