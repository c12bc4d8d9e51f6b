#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discrete movement engine that turns buffered direction requests into
//! validated single-cell steps.

use labyrinth_core::{ActorSnapshot, Command, Coordinate, Direction, Event, Grid};

/// Result of evaluating one step for an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Cell the actor occupies after the step.
    pub coordinate: Coordinate,
    /// Direction the actor executes after the step.
    pub facing: Direction,
}

/// Reports whether a single step from `origin` toward `direction` lands on a path cell.
///
/// [`Direction::Invalid`] and steps leaving the grid are always blocked.
#[must_use]
pub fn is_step_open(grid: &Grid, origin: Coordinate, direction: Direction) -> bool {
    origin
        .step(direction)
        .is_some_and(|target| grid.is_path(target))
}

/// Evaluates the next step for an actor.
///
/// A pending turn is taken as soon as it opens; until then the actor keeps
/// running in its current facing and stalls against walls.
#[must_use]
pub fn step(
    grid: &Grid,
    coordinate: Coordinate,
    facing: Direction,
    requested: Direction,
) -> StepOutcome {
    if requested != facing && is_step_open(grid, coordinate, requested) {
        return advance(coordinate, requested);
    }
    if is_step_open(grid, coordinate, facing) {
        return advance(coordinate, facing);
    }
    StepOutcome { coordinate, facing }
}

fn advance(coordinate: Coordinate, direction: Direction) -> StepOutcome {
    StepOutcome {
        coordinate: coordinate.step(direction).unwrap_or(coordinate),
        facing: direction,
    }
}

/// Pure system that reacts to time advancing and emits step commands.
#[derive(Debug, Default)]
pub struct Movement {
    halted: bool,
}

impl Movement {
    /// Creates a movement system ready to drive actors.
    #[must_use]
    pub const fn new() -> Self {
        Self { halted: false }
    }

    /// Reports whether a game over stopped the system until the next maze loads.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Consumes world events and actor snapshots to emit step commands.
    ///
    /// One [`Command::StepActor`] is emitted per ready, mobile actor whenever
    /// the events contain [`Event::TimeAdvanced`].
    pub fn handle(
        &mut self,
        events: &[Event],
        actors: &[ActorSnapshot],
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        let mut time_advanced = false;
        for event in events {
            match event {
                Event::MazeLoaded { .. } => self.halted = false,
                Event::GameOver { .. } => self.halted = true,
                Event::TimeAdvanced { .. } => time_advanced = true,
                _ => {}
            }
        }

        if self.halted || !time_advanced {
            return;
        }

        for actor in actors {
            if !actor.kind.is_mobile() || !actor.phase.is_ready() {
                continue;
            }
            let outcome = step(grid, actor.coordinate, actor.facing, actor.requested);
            out.push(Command::StepActor {
                actor: actor.id,
                to: outcome.coordinate,
                facing: outcome.facing,
            });
        }
    }
}
