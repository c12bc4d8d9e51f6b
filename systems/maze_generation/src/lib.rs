#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized-Prim maze carving over a sealed all-wall grid.
//!
//! The generator only ever carves odd-odd cells and the single joint cell
//! between two of them, so corridors are one cell wide and the boundary ring
//! is never touched. Every random draw goes through the supplied
//! [`RandomSource`], which makes the resulting bitmap a pure function of the
//! grid dimensions and the draw sequence.

use labyrinth_core::{Coordinate, Direction, Grid, RandomSource};
use tracing::debug;

/// Frontier cells with more than this many carved neighbours are discarded.
const MAX_CONNECTIONS: usize = 2;
/// Joints touching at least this many carved cells are never opened.
const JOINT_PATH_LIMIT: usize = 3;

/// Summary of a single generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Odd interior cell the carving started from.
    pub seed: Coordinate,
    /// Number of cells turned into paths, seed included.
    pub carved: usize,
    /// Number of frontier draws.
    pub iterations: usize,
    /// Frontier cells dropped for having zero or too many carved neighbours.
    pub discarded_frontiers: usize,
    /// Carving attempts aborted because the joint touched too many paths.
    pub rejected_joints: usize,
}

/// Stateless maze generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Carves a connected maze into `grid`.
    ///
    /// The grid is expected to be freshly constructed: boundary sealed and
    /// every interior cell a wall.
    pub fn generate<R>(&self, grid: &mut Grid, random: &mut R) -> GenerationReport
    where
        R: RandomSource + ?Sized,
    {
        let seed_x = 2 * random.next_int(0, (grid.width() - 1) / 2) + 1;
        let seed_y = 2 * random.next_int(0, (grid.height() - 1) / 2) + 1;
        let seed = Coordinate::new(seed_x, seed_y);

        let mut report = GenerationReport {
            seed,
            carved: 0,
            iterations: 0,
            discarded_frontiers: 0,
            rejected_joints: 0,
        };
        report.carved += carve(grid, seed);

        let mut frontier = Frontier::default();
        frontier.expand_from(grid, seed);

        while !frontier.is_empty() {
            report.iterations += 1;
            let index = draw_index(random, frontier.len());
            let Some(cell) = frontier.get(index) else {
                break;
            };

            let connections = carved_neighbours(grid, cell, 2);
            if connections.is_empty() || connections.len() > MAX_CONNECTIONS {
                report.discarded_frontiers += 1;
            } else {
                let choice = draw_index(random, connections.len());
                let joint = connections
                    .get(choice)
                    .and_then(|direction| cell.step(*direction));
                match joint {
                    Some(joint) if joint_is_open(grid, joint) => {
                        report.carved += carve(grid, cell);
                        report.carved += carve(grid, joint);
                        frontier.expand_from(grid, cell);
                    }
                    _ => report.rejected_joints += 1,
                }
            }

            frontier.remove(index);
        }

        debug!(
            seed = %report.seed,
            carved = report.carved,
            iterations = report.iterations,
            discarded = report.discarded_frontiers,
            rejected = report.rejected_joints,
            "maze generated"
        );
        report
    }
}

/// Insertion-ordered, duplicate-free set of candidate cells.
#[derive(Debug, Default)]
struct Frontier {
    cells: Vec<Coordinate>,
}

impl Frontier {
    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn get(&self, index: usize) -> Option<Coordinate> {
        self.cells.get(index).copied()
    }

    fn remove(&mut self, index: usize) {
        if index < self.cells.len() {
            let _ = self.cells.remove(index);
        }
    }

    /// Queues the uncarved cells two steps away from `origin`.
    fn expand_from(&mut self, grid: &Grid, origin: Coordinate) {
        for direction in Direction::CARDINALS {
            let Some(candidate) = origin.offset(direction, 2) else {
                continue;
            };
            if !grid.contains(candidate)
                || grid.is_path(candidate)
                || self.cells.contains(&candidate)
            {
                continue;
            }
            self.cells.push(candidate);
        }
    }
}

/// Directions whose cell `distance` steps away is already carved.
fn carved_neighbours(grid: &Grid, origin: Coordinate, distance: u32) -> Vec<Direction> {
    Direction::CARDINALS
        .into_iter()
        .filter(|direction| {
            origin
                .offset(*direction, distance)
                .is_some_and(|neighbour| grid.is_path(neighbour))
        })
        .collect()
}

/// A joint may only be opened while it touches fewer than [`JOINT_PATH_LIMIT`] paths.
fn joint_is_open(grid: &Grid, joint: Coordinate) -> bool {
    carved_neighbours(grid, joint, 1).len() < JOINT_PATH_LIMIT
}

fn draw_index<R>(random: &mut R, len: usize) -> usize
where
    R: RandomSource + ?Sized,
{
    let upper = u32::try_from(len).unwrap_or(u32::MAX);
    usize::try_from(random.next_int(0, upper)).unwrap_or(0)
}

/// Carves `coordinate`, returning how many cells changed.
fn carve(grid: &mut Grid, coordinate: Coordinate) -> usize {
    if !grid.contains(coordinate) || grid.is_path(coordinate) {
        return 0;
    }
    match grid.set_path(coordinate) {
        Ok(()) if grid.is_path(coordinate) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_skips_duplicates_and_carved_cells() {
        let mut grid = Grid::new(9, 9);
        grid.set_path(Coordinate::new(3, 5)).expect("in bounds");
        let mut frontier = Frontier::default();

        frontier.expand_from(&grid, Coordinate::new(3, 3));
        frontier.expand_from(&grid, Coordinate::new(5, 5));

        assert_eq!(
            frontier.cells,
            vec![
                Coordinate::new(3, 1),
                Coordinate::new(5, 3),
                Coordinate::new(1, 3),
                Coordinate::new(5, 7),
                Coordinate::new(7, 5),
            ]
        );
    }

    #[test]
    fn frontier_ignores_cells_beyond_the_grid() {
        let grid = Grid::new(5, 5);
        let mut frontier = Frontier::default();
        frontier.expand_from(&grid, Coordinate::new(1, 1));
        assert_eq!(
            frontier.cells,
            vec![Coordinate::new(1, 3), Coordinate::new(3, 1)]
        );
    }

    #[test]
    fn joints_touching_three_paths_stay_closed() {
        let mut grid = Grid::new(7, 7);
        for (x, y) in [(2, 2), (4, 2)] {
            grid.set_path(Coordinate::new(x, y)).expect("in bounds");
        }
        let joint = Coordinate::new(3, 2);
        assert!(joint_is_open(&grid, joint));

        grid.set_path(Coordinate::new(3, 1)).expect("in bounds");
        assert!(!joint_is_open(&grid, joint));
    }

    #[test]
    fn carving_counts_only_fresh_cells() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(carve(&mut grid, Coordinate::new(1, 1)), 1);
        assert_eq!(carve(&mut grid, Coordinate::new(1, 1)), 0);
        assert_eq!(carve(&mut grid, Coordinate::new(0, 1)), 0);
        assert_eq!(carve(&mut grid, Coordinate::new(10, 1)), 0);
    }
}
