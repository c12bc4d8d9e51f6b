//! Frame loop wiring the pure systems to the authoritative world.

use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use labyrinth_core::{
    ActorKind, ActorSnapshot, Command, Event, Grid, GridError, InputSource, RandomSource,
};
use labyrinth_rendering::{ActorPresentation, Hud, RenderingBackend, Scene};
use labyrinth_system_bootstrap::{self as bootstrap, Bootstrap};
use labyrinth_system_movement::Movement;
use labyrinth_system_navigation::{self as navigation, Navigation};
use labyrinth_system_spawning::{self as spawning, Spawning};
use labyrinth_world::{self as world, query, GameOutcome, World};
use tracing::{debug, info};

const DEFAULT_FRAME: Duration = Duration::from_millis(50);

/// Tunables for a simulated session.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Simulated time covered by one frame.
    pub frame: Duration,
    /// Maze size and opening enemy.
    pub bootstrap: bootstrap::Config,
    /// Coin cadence and enemy milestones.
    pub spawning: spawning::Config,
    /// Enemy navigation schedule.
    pub navigation: navigation::Config,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame: DEFAULT_FRAME,
            bootstrap: bootstrap::Config::default(),
            spawning: spawning::Config::default(),
            navigation: navigation::Config::default(),
        }
    }
}

/// How a [`Simulation::run`] ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Frames simulated during the run.
    pub frames: u64,
    /// Coins held when the run stopped.
    pub coins_collected: u32,
    /// Set when an enemy caught the player.
    pub outcome: Option<GameOutcome>,
}

/// Headless game session driven frame by frame.
#[derive(Debug)]
pub struct Simulation<R, I> {
    world: World,
    bootstrap: Bootstrap,
    movement: Movement,
    navigation: Navigation,
    spawning: Spawning,
    random: R,
    input: I,
    frame: Duration,
    log: Vec<Event>,
}

impl<R, I> Simulation<R, I>
where
    R: RandomSource,
    I: InputSource,
{
    /// Generates a fresh level and places the opening actors.
    pub fn new(config: SimulationConfig, mut random: R, input: I) -> Result<Self, GridError> {
        let bootstrap = Bootstrap::new(config.bootstrap);
        let mut commands = Vec::new();
        let report = bootstrap.prepare_level(&mut random, &mut commands)?;
        info!(
            carved = report.generation.carved,
            iterations = report.generation.iterations,
            "maze generated"
        );
        Ok(Self::assemble(config, bootstrap, random, input, commands))
    }

    /// Places the opening actors in an existing maze.
    pub fn with_grid(
        config: SimulationConfig,
        grid: Grid,
        mut random: R,
        input: I,
    ) -> Result<Self, GridError> {
        let bootstrap = Bootstrap::new(config.bootstrap);
        let mut commands = Vec::new();
        let _ = bootstrap.populate_level(grid, &mut random, &mut commands)?;
        Ok(Self::assemble(config, bootstrap, random, input, commands))
    }

    fn assemble(
        config: SimulationConfig,
        bootstrap: Bootstrap,
        random: R,
        input: I,
        commands: Vec<Command>,
    ) -> Self {
        let mut simulation = Self {
            world: World::new(),
            bootstrap,
            movement: Movement::new(),
            navigation: Navigation::new(config.navigation),
            spawning: Spawning::new(config.spawning),
            random,
            input,
            frame: config.frame,
            log: Vec::new(),
        };
        let mut events = Vec::new();
        simulation.apply_all(commands, &mut events);
        simulation.log.extend(events);
        simulation
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Banner greeting the player.
    #[must_use]
    pub fn welcome_banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Every event emitted since the level opened.
    #[must_use]
    pub fn event_log(&self) -> &[Event] {
        &self.log
    }

    /// Reports whether an enemy caught the player.
    #[must_use]
    pub fn is_over(&self) -> bool {
        query::session(&self.world).is_over()
    }

    /// Advances the session by one frame and returns the frame's events.
    ///
    /// The player moves before the enemies, so a catch during the player's
    /// step halts the enemies for the rest of the frame.
    pub fn tick(&mut self) -> Result<Vec<Event>, GridError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt: self.frame }, &mut events);

        if let Some(player) = query::player(&self.world) {
            let direction = self.input.poll_requested_direction();
            if direction.is_valid() {
                world::apply(
                    &mut self.world,
                    Command::RequestDirection {
                        actor: player.id,
                        direction,
                    },
                    &mut events,
                );
            }
        }
        let player: Vec<ActorSnapshot> = query::player(&self.world).into_iter().collect();
        let mut commands = Vec::new();
        self.movement
            .handle(&events, &player, query::grid(&self.world), &mut commands);
        self.apply_all(commands, &mut events);

        let target = query::player(&self.world).map(|player| player.coordinate);
        let coins = query::session(&self.world).coins_collected();
        let enemies = query::actor_view(&self.world).enemies();
        let mut commands = Vec::new();
        self.navigation.handle(
            &events,
            &enemies,
            query::grid(&self.world),
            target,
            coins,
            &mut self.random,
            &mut commands,
        );
        self.apply_all(commands, &mut events);

        let enemies = query::actor_view(&self.world).enemies();
        let mut commands = Vec::new();
        self.movement
            .handle(&events, &enemies, query::grid(&self.world), &mut commands);
        self.apply_all(commands, &mut events);

        let player = query::player(&self.world).map(|player| player.coordinate);
        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::grid(&self.world),
            player,
            query::live_coin_count(&self.world),
            query::session(&self.world).coins_collected(),
            &mut self.random,
            &mut commands,
        )?;
        self.apply_all(commands, &mut events);

        self.log.extend(events.iter().cloned());
        Ok(events)
    }

    /// Runs up to `max_frames` frames or until the session ends.
    ///
    /// Committed steps are forwarded to the backend as they happen. The whole
    /// scene is presented every `present_every` frames (never when zero) and
    /// once more when the run stops.
    pub fn run<B>(
        &mut self,
        max_frames: u64,
        present_every: u64,
        backend: &mut B,
    ) -> AnyResult<RunSummary>
    where
        B: RenderingBackend + ?Sized,
    {
        let mut frames = 0;
        while frames < max_frames && !self.is_over() {
            let events = self.tick().context("session needs a maze with paths")?;
            frames += 1;

            for event in &events {
                if let Event::ActorAdvanced {
                    kind, to, facing, ..
                } = event
                {
                    backend.render_step(&ActorPresentation {
                        kind: *kind,
                        coordinate: *to,
                        facing: *facing,
                    })?;
                }
            }

            if present_every > 0 && frames % present_every == 0 {
                backend.present(&self.scene())?;
            }
        }
        backend.present(&self.scene())?;

        let session = query::session(&self.world);
        debug!(frames, coins = session.coins_collected(), "run finished");
        Ok(RunSummary {
            frames,
            coins_collected: session.coins_collected(),
            outcome: session.outcome(),
        })
    }

    /// Captures the current frame for a rendering backend.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let view = query::actor_view(&self.world);
        let actors = view.iter().map(ActorPresentation::from).collect();
        let session = query::session(&self.world);
        let hud = Hud {
            coins_collected: session.coins_collected(),
            speed_multiplier: session.speed_multiplier(),
            tick: query::tick_index(&self.world),
            caught_by: session.outcome().map(|outcome| outcome.caught_by()),
        };
        Scene::new(query::grid(&self.world), actors, hud)
    }

    /// Number of live actors of `kind`.
    #[must_use]
    pub fn live_count(&self, kind: ActorKind) -> usize {
        query::live_count(&self.world, kind)
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }
}
