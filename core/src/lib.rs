#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the labyrinth engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots such as [`ActorView`] and [`Grid`], and respond exclusively with
//! new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

mod grid;
mod random;

pub use grid::{pick_random_coordinate, Grid, GridError, MIN_DIMENSION};
#[cfg(feature = "scripted_random")]
pub use random::ScriptedRandom;
pub use random::{RandomSource, SeededRandom};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Labyrinth.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's grid with a freshly generated maze and resets the session.
    LoadMaze {
        /// Grid produced by the maze generator.
        grid: Grid,
    },
    /// Requests that an actor of the provided kind enter the maze.
    SpawnActor {
        /// Kind of actor to create.
        kind: ActorKind,
        /// Path cell the actor should occupy.
        at: Coordinate,
    },
    /// Removes an actor from the registry, cancelling its movement loop.
    DespawnActor {
        /// Identifier of the actor to remove.
        actor: ActorId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Buffers the direction an actor wishes to travel next.
    RequestDirection {
        /// Identifier of the actor expressing the intent.
        actor: ActorId,
        /// Desired direction; [`Direction::Invalid`] clears nothing and is ignored.
        direction: Direction,
    },
    /// Commits the outcome of a movement engine step for an actor.
    StepActor {
        /// Identifier of the actor that steps.
        actor: ActorId,
        /// Cell the actor occupies after the step. Equal to the current cell on a stall.
        to: Coordinate,
        /// Facing the actor adopts after the step.
        facing: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new maze replaced the previous grid.
    MazeLoaded {
        /// Width of the loaded grid in cells.
        width: u32,
        /// Height of the loaded grid in cells.
        height: u32,
        /// Number of carved path cells.
        path_cells: usize,
    },
    /// Confirms that an actor entered the maze.
    ActorSpawned {
        /// Identifier assigned to the actor.
        actor: ActorId,
        /// Kind of the spawned actor.
        kind: ActorKind,
        /// Cell the actor occupies after spawning.
        at: Coordinate,
        /// Initial facing of the actor.
        facing: Direction,
    },
    /// Reports that a spawn request was refused.
    SpawnRejected {
        /// Kind of actor requested.
        kind: ActorKind,
        /// Requested spawn cell.
        at: Coordinate,
        /// Specific reason the spawn failed.
        reason: SpawnRejection,
    },
    /// Confirms that an actor left the registry.
    ActorDespawned {
        /// Identifier of the removed actor.
        actor: ActorId,
        /// Kind of the removed actor.
        kind: ActorKind,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor committed a single-cell step.
    ActorAdvanced {
        /// Identifier of the actor that moved.
        actor: ActorId,
        /// Kind of the actor that moved.
        kind: ActorKind,
        /// Cell the actor occupied before moving.
        from: Coordinate,
        /// Cell the actor occupies after moving.
        to: Coordinate,
        /// Facing adopted with the step.
        facing: Direction,
    },
    /// Reports that a step command was refused.
    StepRejected {
        /// Identifier of the actor whose step was refused.
        actor: ActorId,
        /// Specific reason the step failed.
        reason: StepRejection,
    },
    /// Announces that the player picked up a coin.
    CoinCollected {
        /// Identifier of the collected coin.
        coin: ActorId,
        /// Cell where the coin was collected.
        at: Coordinate,
        /// Total number of coins collected in the session afterwards.
        coins_collected: u32,
    },
    /// Announces that an enemy caught the player and the session ended.
    GameOver {
        /// Kind of enemy that caught the player.
        caught_by: ActorKind,
        /// Coins credited to the player when the session ended.
        coins_collected: u32,
    },
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnRejection {
    /// The requested cell is not a path cell.
    NotPath,
    /// A player already inhabits the maze.
    PlayerExists,
    /// The session already ended.
    SessionOver,
}

/// Reasons a step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepRejection {
    /// No actor with the provided identifier exists.
    UnknownActor,
    /// The actor kind never moves.
    Immobile,
    /// The actor is still animating its previous step.
    NotReady,
    /// The destination is neither the current cell nor one of its axis neighbours.
    NotAdjacent,
    /// The destination cell is a wall.
    Blocked,
    /// The session already ended.
    SessionOver,
}

/// Cardinal movement directions, plus the "no direction" sentinel.
///
/// North increases `y`, East increases `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    North,
    /// Movement toward decreasing `y`.
    South,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward decreasing `x`.
    West,
    /// No movement request, or no viable heuristic result.
    #[default]
    Invalid,
}

impl Direction {
    /// The four cardinal directions in probing order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Reports whether the direction is one of the four cardinals.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Invalid => Self::Invalid,
        }
    }

    /// Direction after a quarter turn clockwise.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::Invalid => Self::Invalid,
        }
    }

    /// Direction after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
            Self::Invalid => Self::Invalid,
        }
    }
}

/// Source of user intent polled once per frame for the player.
pub trait InputSource {
    /// Returns the direction the user currently asks for, or [`Direction::Invalid`].
    fn poll_requested_direction(&mut self) -> Direction;
}

/// Location of a single grid cell.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    x: u32,
    y: u32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Neighbouring coordinate one step toward `direction`.
    ///
    /// Returns `None` for [`Direction::Invalid`] and when the step would leave
    /// the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        self.offset(direction, 1)
    }

    /// Coordinate `distance` cells toward `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: u32) -> Option<Self> {
        match direction {
            Direction::North => self.y.checked_add(distance).map(|y| Self::new(self.x, y)),
            Direction::South => self.y.checked_sub(distance).map(|y| Self::new(self.x, y)),
            Direction::East => self.x.checked_add(distance).map(|x| Self::new(x, self.y)),
            Direction::West => self.x.checked_sub(distance).map(|x| Self::new(x, self.y)),
            Direction::Invalid => None,
        }
    }

    /// Reports whether two actors standing on these coordinates coincide.
    #[must_use]
    pub fn is_intersecting(self, other: Coordinate) -> bool {
        self == other
    }

    /// Direction of a single axis step from `self` to `other`.
    ///
    /// Returns [`Direction::Invalid`] unless the coordinates are axis neighbours.
    #[must_use]
    pub fn direction_to(self, other: Coordinate) -> Direction {
        Direction::CARDINALS
            .into_iter()
            .find(|direction| self.step(*direction) == Some(other))
            .unwrap_or(Direction::Invalid)
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Solid cell that may still be carved.
    Wall,
    /// Carved cell traversable by actors.
    Path,
    /// Boundary cell that can never be carved.
    UnbreakableWall,
}

impl Cell {
    /// Reports whether actors may stand on the cell.
    #[must_use]
    pub const fn is_path(self) -> bool {
        matches!(self, Self::Path)
    }

    /// Reports whether the cell blocks movement.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        !self.is_path()
    }
}

/// Unique identifier assigned to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of actors that inhabit the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// The user-controlled actor watched by the intersection pass.
    Player,
    /// Slow enemy whose catch ends the session.
    Zombie,
    /// Faster enemy whose catch also wipes the collected coins.
    Mummy,
    /// Static pickup that rewards the player.
    Coin,
}

impl ActorKind {
    /// Speed of the actor in cells per second before any session multiplier.
    ///
    /// Coins never move and report zero.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::Player => 4.0,
            Self::Zombie => 0.3,
            Self::Mummy => 0.6,
            Self::Coin => 0.0,
        }
    }

    /// Reports whether the kind is driven by the navigation controller.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Zombie | Self::Mummy)
    }

    /// Reports whether the kind ever steps.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        !matches!(self, Self::Coin)
    }

    /// Facing assigned when the actor spawns.
    #[must_use]
    pub const fn initial_facing(self) -> Direction {
        match self {
            Self::Zombie | Self::Mummy => Direction::North,
            Self::Player | Self::Coin => Direction::Invalid,
        }
    }

    /// Consequence of this actor sharing a cell with the player.
    #[must_use]
    pub const fn intersection(self) -> Intersection {
        match self {
            Self::Player => Intersection::Ignore,
            Self::Zombie => Intersection::GameOver,
            Self::Mummy => Intersection::GameOverWithScoreReset,
            Self::Coin => Intersection::CollectCoin,
        }
    }

    /// Time a single step animation lasts, or `None` for static actors.
    ///
    /// Enemy speeds scale with `speed_multiplier`; the player ignores it.
    #[must_use]
    pub fn step_interval(self, speed_multiplier: f32) -> Option<Duration> {
        let speed = if self.is_enemy() {
            self.base_speed() * speed_multiplier
        } else {
            self.base_speed()
        };
        if !speed.is_finite() || speed <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f32(speed.recip()).ok()
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Zombie => "zombie",
            Self::Mummy => "mummy",
            Self::Coin => "coin",
        };
        f.write_str(name)
    }
}

/// Outcome of an actor sharing the player's cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intersection {
    /// Nothing happens.
    Ignore,
    /// The player collects the actor as a coin.
    CollectCoin,
    /// The session ends keeping the collected coins.
    GameOver,
    /// The collected coins are wiped before the session ends.
    GameOverWithScoreReset,
}

/// Step animation sub-state of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActorPhase {
    /// The actor may commit its next step.
    #[default]
    Ready,
    /// The actor is still travelling to the cell of its last committed step.
    Animating {
        /// Simulated time left before the actor becomes ready.
        remaining: Duration,
    },
}

impl ActorPhase {
    /// Reports whether the actor may step.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Grid cell currently occupied by the actor.
    pub coordinate: Coordinate,
    /// Direction the actor is executing.
    pub facing: Direction,
    /// Direction most recently requested for the actor.
    pub requested: Direction,
    /// Step animation sub-state.
    pub phase: ActorPhase,
}

/// Read-only snapshot describing all actors within the maze.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    ///
    /// Identifiers are allocated in spawn order, so sorting by identifier
    /// preserves insertion order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the player, if one is present.
    #[must_use]
    pub fn player(&self) -> Option<&ActorSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.kind == ActorKind::Player)
    }

    /// Snapshots of every enemy, in insertion order.
    #[must_use]
    pub fn enemies(&self) -> Vec<ActorSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.kind.is_enemy())
            .copied()
            .collect()
    }

    /// Snapshot of the actor with the provided identifier.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of actors of the provided kind.
    #[must_use]
    pub fn count(&self, kind: ActorKind) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.kind == kind)
            .count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ActorKind, Coordinate, Direction, Intersection};

    #[test]
    fn turning_right_four_times_returns_to_start() {
        for direction in Direction::CARDINALS {
            let turned = direction
                .turn_right()
                .turn_right()
                .turn_right()
                .turn_right();
            assert_eq!(turned, direction);
            assert_eq!(direction.turn_right().turn_left(), direction);
            assert_eq!(direction.turn_right().turn_right(), direction.opposite());
        }
    }

    #[test]
    fn invalid_direction_is_absorbing() {
        assert_eq!(Direction::Invalid.opposite(), Direction::Invalid);
        assert_eq!(Direction::Invalid.turn_left(), Direction::Invalid);
        assert_eq!(Direction::Invalid.turn_right(), Direction::Invalid);
        assert!(!Direction::Invalid.is_valid());
        assert_eq!(Coordinate::new(3, 3).step(Direction::Invalid), None);
    }

    #[test]
    fn north_increases_y() {
        let origin = Coordinate::new(3, 3);
        assert_eq!(origin.step(Direction::North), Some(Coordinate::new(3, 4)));
        assert_eq!(origin.step(Direction::South), Some(Coordinate::new(3, 2)));
        assert_eq!(origin.step(Direction::East), Some(Coordinate::new(4, 3)));
        assert_eq!(origin.step(Direction::West), Some(Coordinate::new(2, 3)));
        assert_eq!(origin.offset(Direction::North, 2), Some(Coordinate::new(3, 5)));
    }

    #[test]
    fn stepping_below_zero_yields_none() {
        let corner = Coordinate::new(0, 0);
        assert_eq!(corner.step(Direction::South), None);
        assert_eq!(corner.step(Direction::West), None);
    }

    #[test]
    fn direction_to_requires_axis_neighbours() {
        let origin = Coordinate::new(2, 2);
        assert_eq!(origin.direction_to(Coordinate::new(2, 3)), Direction::North);
        assert_eq!(origin.direction_to(Coordinate::new(1, 2)), Direction::West);
        assert_eq!(origin.direction_to(Coordinate::new(3, 3)), Direction::Invalid);
        assert_eq!(origin.direction_to(origin), Direction::Invalid);
    }

    #[test]
    fn intersection_is_coordinate_equality() {
        let first = Coordinate::new(2, 2);
        let second = Coordinate::new(2, 2);
        assert!(first.is_intersecting(second));
        assert!(!first.is_intersecting(Coordinate::new(2, 3)));
    }

    #[test]
    fn capability_table_matches_kinds() {
        assert_eq!(ActorKind::Zombie.intersection(), Intersection::GameOver);
        assert_eq!(
            ActorKind::Mummy.intersection(),
            Intersection::GameOverWithScoreReset
        );
        assert_eq!(ActorKind::Coin.intersection(), Intersection::CollectCoin);
        assert_eq!(ActorKind::Player.initial_facing(), Direction::Invalid);
        assert_eq!(ActorKind::Zombie.initial_facing(), Direction::North);
        assert!(!ActorKind::Coin.is_mobile());
    }

    #[test]
    fn step_interval_scales_enemies_only() {
        assert_eq!(
            ActorKind::Player.step_interval(3.0),
            Some(Duration::from_millis(250))
        );
        let slow = ActorKind::Zombie.step_interval(1.0).expect("zombie moves");
        let fast = ActorKind::Zombie.step_interval(2.0).expect("zombie moves");
        assert!(fast < slow);
        assert_eq!(ActorKind::Coin.step_interval(1.0), None);
        assert_eq!(ActorKind::Mummy.step_interval(0.0), None);
    }
}
