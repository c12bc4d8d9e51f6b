#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a fresh labyrinth level.

use labyrinth_core::{
    pick_random_coordinate, ActorKind, Command, Coordinate, Grid, GridError, RandomSource,
};
use labyrinth_system_maze_generation::{GenerationReport, MazeGenerator};
use labyrinth_world::{query, World};
use tracing::info;

const DEFAULT_WIDTH: u32 = 21;
const DEFAULT_HEIGHT: u32 = 15;

/// Configuration parameters required to construct the bootstrap system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    width: u32,
    height: u32,
    initial_enemy: ActorKind,
}

impl Config {
    /// Creates a configuration for a maze of the requested size.
    ///
    /// The grid normalizes the dimensions, so the generated maze may be larger.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            initial_enemy: ActorKind::Zombie,
        }
    }

    /// Requested maze width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Requested maze height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Enemy that enters the maze together with the player.
    #[must_use]
    pub const fn initial_enemy(&self) -> ActorKind {
        self.initial_enemy
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// Outcome of generating and populating a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelReport {
    /// Summary of the maze carving run.
    pub generation: GenerationReport,
    /// Spawn cell of the player.
    pub player: Coordinate,
    /// Spawn cell of the initial enemy.
    pub enemy: Coordinate,
}

/// Spawn cells chosen for the opening actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Spawn cell of the player.
    pub player: Coordinate,
    /// Spawn cell of the initial enemy.
    pub enemy: Coordinate,
}

/// Produces the commands that open a level and the data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap {
    config: Config,
    generator: MazeGenerator,
}

impl Bootstrap {
    /// Creates a bootstrap system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            generator: MazeGenerator::new(),
        }
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Generates a maze and emits the commands that load it and place the
    /// player and the initial enemy.
    pub fn prepare_level<R>(
        &self,
        random: &mut R,
        out: &mut Vec<Command>,
    ) -> Result<LevelReport, GridError>
    where
        R: RandomSource + ?Sized,
    {
        let mut grid = Grid::new(self.config.width, self.config.height);
        let generation = self.generator.generate(&mut grid, random);
        let placement = self.populate_level(grid, random, out)?;

        Ok(LevelReport {
            generation,
            player: placement.player,
            enemy: placement.enemy,
        })
    }

    /// Emits the commands that load an existing maze and place the player
    /// and the initial enemy in it.
    ///
    /// The enemy avoids the player's cell unless it is the only path cell.
    pub fn populate_level<R>(
        &self,
        grid: Grid,
        random: &mut R,
        out: &mut Vec<Command>,
    ) -> Result<Placement, GridError>
    where
        R: RandomSource + ?Sized,
    {
        let player = grid.pick_random_path_coordinate(random)?;
        let others: Vec<Coordinate> = grid
            .path_coordinates()
            .into_iter()
            .filter(|cell| !cell.is_intersecting(player))
            .collect();
        let enemy = if others.is_empty() {
            player
        } else {
            pick_random_coordinate(&others, random)?
        };

        info!(
            width = grid.width(),
            height = grid.height(),
            path_cells = grid.path_count(),
            %player,
            %enemy,
            "level prepared"
        );

        out.push(Command::LoadMaze { grid });
        out.push(Command::SpawnActor {
            kind: ActorKind::Player,
            at: player,
        });
        out.push(Command::SpawnActor {
            kind: self.config.initial_enemy,
            at: enemy,
        });

        Ok(Placement { player, enemy })
    }
}
