#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for labyrinth adapters.
//!
//! Adapters never read the world directly. The driver captures a [`Scene`]
//! from the grid and actor snapshots, then hands it to a [`RenderingBackend`].

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use labyrinth_core::{ActorKind, ActorSnapshot, Cell, Coordinate, Direction, Grid};

const WALL_GLYPH: char = '#';
const PATH_GLYPH: char = ' ';

/// Glyph used to draw an actor of the provided kind.
#[must_use]
pub const fn actor_glyph(kind: ActorKind) -> char {
    match kind {
        ActorKind::Player => '@',
        ActorKind::Zombie => 'Z',
        ActorKind::Mummy => 'M',
        ActorKind::Coin => '$',
    }
}

/// Glyph used to draw a bare cell.
#[must_use]
pub const fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Path => PATH_GLYPH,
        Cell::Wall | Cell::UnbreakableWall => WALL_GLYPH,
    }
}

/// Immutable description of an actor drawn in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorPresentation {
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Cell occupied by the actor.
    pub coordinate: Coordinate,
    /// Direction the actor is executing.
    pub facing: Direction,
}

impl From<&ActorSnapshot> for ActorPresentation {
    fn from(snapshot: &ActorSnapshot) -> Self {
        Self {
            kind: snapshot.kind,
            coordinate: snapshot.coordinate,
            facing: snapshot.facing,
        }
    }
}

/// Session counters shown next to the maze.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hud {
    /// Coins the player collected.
    pub coins_collected: u32,
    /// Factor currently applied to enemy speeds.
    pub speed_multiplier: f32,
    /// Number of ticks simulated so far.
    pub tick: u64,
    /// Enemy that ended the session, if any.
    pub caught_by: Option<ActorKind>,
}

impl Hud {
    /// Single status line summarising the counters.
    #[must_use]
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "tick {} | coins {} | enemy speed x{:.1}",
            self.tick, self.coins_collected, self.speed_multiplier
        );
        if let Some(kind) = self.caught_by {
            line.push_str(&format!(" | caught by {kind}"));
        }
        line
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    actors: Vec<ActorPresentation>,
    hud: Hud,
}

impl Scene {
    /// Captures the grid together with the actors standing in it.
    #[must_use]
    pub fn new(grid: &Grid, actors: Vec<ActorPresentation>, hud: Hud) -> Self {
        let cells = grid
            .coordinates()
            .map(|coordinate| grid.cell(coordinate).unwrap_or(Cell::UnbreakableWall))
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
            actors,
            hud,
        }
    }

    /// Width of the captured grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the captured grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Actors drawn on top of the grid.
    #[must_use]
    pub fn actors(&self) -> &[ActorPresentation] {
        &self.actors
    }

    /// Counters drawn next to the grid.
    #[must_use]
    pub const fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Glyph visible at `coordinate`.
    ///
    /// When several actors share a cell the player wins over enemies, and
    /// enemies win over coins.
    #[must_use]
    pub fn glyph_at(&self, coordinate: Coordinate) -> char {
        let top = self
            .actors
            .iter()
            .filter(|actor| actor.coordinate == coordinate)
            .min_by_key(|actor| draw_priority(actor.kind));
        if let Some(actor) = top {
            return actor_glyph(actor.kind);
        }
        self.cell(coordinate).map_or(WALL_GLYPH, cell_glyph)
    }

    /// Text rows, north at the top.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| self.glyph_at(Coordinate::new(x, y)))
                    .collect()
            })
            .collect()
    }

    fn cell(&self, coordinate: Coordinate) -> Option<Cell> {
        if coordinate.x() >= self.width || coordinate.y() >= self.height {
            return None;
        }
        let index = usize::try_from(u64::from(coordinate.y()) * u64::from(self.width)).ok()?;
        let column = usize::try_from(coordinate.x()).ok()?;
        self.cells.get(index + column).copied()
    }
}

const fn draw_priority(kind: ActorKind) -> u8 {
    match kind {
        ActorKind::Player => 0,
        ActorKind::Zombie | ActorKind::Mummy => 1,
        ActorKind::Coin => 2,
    }
}

/// Rendering backend capable of presenting scenes.
pub trait RenderingBackend {
    /// Draws a complete frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Invoked once for every committed step so backends can animate it.
    fn render_step(&mut self, _actor: &ActorPresentation) -> AnyResult<()> {
        Ok(())
    }
}

/// Backend that writes scenes as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    frames: usize,
    steps: usize,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames: 0,
            steps: 0,
        }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Number of committed steps reported so far.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Consumes the backend, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        for row in scene.rows() {
            writeln!(self.writer, "{row}").context("failed to write maze row")?;
        }
        writeln!(self.writer, "{}", scene.hud().status_line())
            .context("failed to write status line")?;
        self.writer.flush().context("failed to flush frame")?;
        self.frames += 1;
        Ok(())
    }

    fn render_step(&mut self, _actor: &ActorPresentation) -> AnyResult<()> {
        self.steps += 1;
        Ok(())
    }
}
