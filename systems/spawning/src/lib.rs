#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Periodic spawning system responsible for emitting coin and enemy spawn commands.

use std::time::Duration;

use labyrinth_core::{
    pick_random_coordinate, ActorKind, Command, Coordinate, Event, Grid, GridError, RandomSource,
};
use tracing::debug;

const DEFAULT_COIN_PERIOD: Duration = Duration::from_secs(3);
const DEFAULT_MAX_LIVE_COINS: usize = 10;
const DEFAULT_MILESTONES: [EnemyMilestone; 2] = [
    EnemyMilestone::new(5, ActorKind::Zombie),
    EnemyMilestone::new(10, ActorKind::Mummy),
];

/// Enemy that joins the maze once enough coins were collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyMilestone {
    coins: u32,
    kind: ActorKind,
}

impl EnemyMilestone {
    /// Creates a milestone spawning `kind` at `coins` collected coins.
    #[must_use]
    pub const fn new(coins: u32, kind: ActorKind) -> Self {
        Self { coins, kind }
    }

    /// Collected coins required to reach the milestone.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Kind of enemy spawned at the milestone.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    coin_period: Duration,
    max_live_coins: usize,
    milestones: Vec<EnemyMilestone>,
}

impl Config {
    /// Creates a configuration with the provided coin cadence and cap and no milestones.
    #[must_use]
    pub const fn new(coin_period: Duration, max_live_coins: usize) -> Self {
        Self {
            coin_period,
            max_live_coins,
            milestones: Vec::new(),
        }
    }

    /// Replaces the enemy milestones. They are reached in order.
    #[must_use]
    pub fn with_milestones(mut self, milestones: Vec<EnemyMilestone>) -> Self {
        self.milestones = milestones;
        self
    }

    /// Simulated time between spawn checks.
    #[must_use]
    pub const fn coin_period(&self) -> Duration {
        self.coin_period
    }

    /// Maximum number of coins alive at once.
    #[must_use]
    pub const fn max_live_coins(&self) -> usize {
        self.max_live_coins
    }

    /// Enemy milestones in the order they are reached.
    #[must_use]
    pub fn milestones(&self) -> &[EnemyMilestone] {
        &self.milestones
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_COIN_PERIOD, DEFAULT_MAX_LIVE_COINS)
            .with_milestones(DEFAULT_MILESTONES.to_vec())
    }
}

/// Pure system that emits spawn commands once per elapsed spawn period.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    next_milestone: usize,
    halted: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
            next_milestone: 0,
            halted: false,
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Fails only when a spawn is due and the maze holds no path cell.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        grid: &Grid,
        player: Option<Coordinate>,
        live_coins: usize,
        coins_collected: u32,
        random: &mut R,
        out: &mut Vec<Command>,
    ) -> Result<(), GridError>
    where
        R: RandomSource + ?Sized,
    {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::MazeLoaded { .. } => {
                    self.accumulator = Duration::ZERO;
                    self.next_milestone = 0;
                    self.halted = false;
                }
                Event::GameOver { .. } => self.halted = true,
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if self.halted || accumulated.is_zero() {
            return Ok(());
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let periods = self.resolve_periods();
        let mut live_coins = live_coins;

        for _ in 0..periods {
            if live_coins < self.config.max_live_coins {
                if let Some(at) = pick_spawn_cell(grid, player, false, random)? {
                    debug!(%at, "coin scheduled");
                    out.push(Command::SpawnActor {
                        kind: ActorKind::Coin,
                        at,
                    });
                    live_coins += 1;
                }
            }

            while let Some(milestone) = self.config.milestones.get(self.next_milestone).copied() {
                if coins_collected < milestone.coins() {
                    break;
                }
                self.next_milestone += 1;
                if let Some(at) = pick_spawn_cell(grid, player, true, random)? {
                    debug!(kind = %milestone.kind(), %at, coins = coins_collected, "enemy scheduled");
                    out.push(Command::SpawnActor {
                        kind: milestone.kind(),
                        at,
                    });
                }
            }
        }

        Ok(())
    }

    fn resolve_periods(&mut self) -> usize {
        let period = self.config.coin_period;
        if period.is_zero() {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        let mut periods = 0;
        while self.accumulator >= period {
            self.accumulator -= period;
            periods += 1;
        }
        periods
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Draws a path cell other than the player's.
///
/// When the player stands on the only path cell, enemies may still share it
/// while coins are skipped.
fn pick_spawn_cell<R>(
    grid: &Grid,
    player: Option<Coordinate>,
    allow_player_cell: bool,
    random: &mut R,
) -> Result<Option<Coordinate>, GridError>
where
    R: RandomSource + ?Sized,
{
    let paths = grid.path_coordinates();
    if paths.is_empty() {
        return Err(GridError::NoPathAvailable);
    }

    let free: Vec<Coordinate> = paths
        .iter()
        .copied()
        .filter(|cell| player.map_or(true, |player| !player.is_intersecting(*cell)))
        .collect();

    if !free.is_empty() {
        return pick_random_coordinate(&free, random).map(Some);
    }
    if allow_player_cell {
        return pick_random_coordinate(&paths, random).map(Some);
    }
    Ok(None)
}
