//! Rectangular cell grid carved by the maze generator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, Coordinate, RandomSource};

/// Smallest width or height a grid may have.
pub const MIN_DIMENSION: u32 = 5;

/// Errors raised by direct grid indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside `[0, width) x [0, height)`.
    #[error("coordinate ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column of the offending coordinate.
        x: u32,
        /// Row of the offending coordinate.
        y: u32,
        /// Width of the grid.
        width: u32,
        /// Height of the grid.
        height: u32,
    },
    /// A random path cell was requested but no path cell exists.
    #[error("the grid contains no path cell")]
    NoPathAvailable,
}

/// Rectangular array of cells with a sealed boundary ring.
///
/// Dimensions are always odd and at least [`MIN_DIMENSION`]. Cells are stored
/// row-major, `y * width + x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-wall grid whose boundary ring is unbreakable.
    ///
    /// Dimensions below [`MIN_DIMENSION`] are raised to it and even
    /// dimensions are incremented by one.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = normalize_dimension(width);
        let height = normalize_dimension(height);
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::Wall; capacity],
        };
        for y in 0..height {
            for x in 0..width {
                let coordinate = Coordinate::new(x, y);
                if grid.is_boundary(coordinate) {
                    let _ = grid.set_unbreakable_wall(coordinate);
                }
            }
        }
        grid
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.x() < self.width && coordinate.y() < self.height
    }

    /// Reports whether the coordinate lies on the outer ring.
    #[must_use]
    pub const fn is_boundary(&self, coordinate: Coordinate) -> bool {
        self.contains(coordinate)
            && (coordinate.x() == 0
                || coordinate.y() == 0
                || coordinate.x() == self.width - 1
                || coordinate.y() == self.height - 1)
    }

    /// Cell stored at the coordinate.
    pub fn cell_at(&self, coordinate: Coordinate) -> Result<Cell, GridError> {
        self.cell(coordinate)
            .ok_or_else(|| self.out_of_bounds(coordinate))
    }

    /// Cell stored at the coordinate, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, coordinate: Coordinate) -> Option<Cell> {
        self.index(coordinate)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the coordinate is a carved path cell.
    #[must_use]
    pub fn is_path(&self, coordinate: Coordinate) -> bool {
        self.cell(coordinate).is_some_and(Cell::is_path)
    }

    /// Reports whether the coordinate blocks movement. Cells outside the grid block.
    #[must_use]
    pub fn is_blocked(&self, coordinate: Coordinate) -> bool {
        !self.is_path(coordinate)
    }

    /// Carves the cell. Unbreakable walls and existing paths are left untouched.
    pub fn set_path(&mut self, coordinate: Coordinate) -> Result<(), GridError> {
        let index = self
            .index(coordinate)
            .ok_or_else(|| self.out_of_bounds(coordinate))?;
        if let Some(slot) = self.cells.get_mut(index) {
            if *slot == Cell::Wall {
                *slot = Cell::Path;
            }
        }
        Ok(())
    }

    /// Forces the cell to an unbreakable wall.
    ///
    /// The constructor seals the boundary ring with it before any carving.
    pub fn set_unbreakable_wall(&mut self, coordinate: Coordinate) -> Result<(), GridError> {
        let index = self
            .index(coordinate)
            .ok_or_else(|| self.out_of_bounds(coordinate))?;
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = Cell::UnbreakableWall;
        }
        Ok(())
    }

    /// Every path cell in row-major order.
    #[must_use]
    pub fn path_coordinates(&self) -> Vec<Coordinate> {
        self.coordinates()
            .filter(|coordinate| self.is_path(*coordinate))
            .collect()
    }

    /// Number of carved path cells.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_path()).count()
    }

    /// Iterator over every coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coordinate::new(x, y)))
    }

    /// Draws a uniformly random path cell.
    pub fn pick_random_path_coordinate<R>(&self, random: &mut R) -> Result<Coordinate, GridError>
    where
        R: RandomSource + ?Sized,
    {
        pick_random_coordinate(&self.path_coordinates(), random)
    }

    fn index(&self, coordinate: Coordinate) -> Option<usize> {
        if !self.contains(coordinate) {
            return None;
        }
        let row = usize::try_from(coordinate.y()).ok()?;
        let column = usize::try_from(coordinate.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    fn out_of_bounds(&self, coordinate: Coordinate) -> GridError {
        GridError::OutOfBounds {
            x: coordinate.x(),
            y: coordinate.y(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Draws one coordinate uniformly from `candidates`.
pub fn pick_random_coordinate<R>(
    candidates: &[Coordinate],
    random: &mut R,
) -> Result<Coordinate, GridError>
where
    R: RandomSource + ?Sized,
{
    if candidates.is_empty() {
        return Err(GridError::NoPathAvailable);
    }
    let upper = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
    let index = usize::try_from(random.next_int(0, upper)).unwrap_or(0);
    candidates
        .get(index)
        .copied()
        .ok_or(GridError::NoPathAvailable)
}

fn normalize_dimension(value: u32) -> u32 {
    let value = value.max(MIN_DIMENSION);
    if value % 2 == 0 {
        value.saturating_add(1)
    } else {
        value
    }
}
