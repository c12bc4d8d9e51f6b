//! Text, JSON and share-code renditions of a generated maze.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use labyrinth_core::{Coordinate, Grid, MIN_DIMENSION};
use labyrinth_rendering::{Hud, Scene};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "labyrinth";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded maze payload.
pub const SNAPSHOT_HEADER: &str = "labyrinth:v1";
const FIELD_DELIMITER: char = ':';

const PATH_SYMBOL: char = '.';
const WALL_SYMBOL: char = '#';

/// Snapshot of every cell of a maze, stored as rows of symbols.
///
/// Row `0` is `y = 0`, the southern edge. `.` marks a path cell and `#` a wall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    /// Number of columns in the maze.
    pub width: u32,
    /// Number of rows in the maze.
    pub height: u32,
    /// Cell symbols, one string per row.
    pub rows: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct SerializableRows {
    rows: Vec<String>,
}

impl MazeSnapshot {
    /// Captures the cells of `grid`.
    #[must_use]
    pub fn capture(grid: &Grid) -> Self {
        let rows = (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .map(|x| {
                        if grid.is_path(Coordinate::new(x, y)) {
                            PATH_SYMBOL
                        } else {
                            WALL_SYMBOL
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            rows,
        }
    }

    /// Rebuilds the grid described by the snapshot.
    ///
    /// The declared dimensions must already be normalized and match the rows
    /// before any cell is allocated.
    pub fn to_grid(&self) -> Result<Grid, MazeTransferError> {
        if !is_normalized(self.width) || !is_normalized(self.height) {
            return Err(MazeTransferError::InvalidDimensions(format!(
                "{}x{}",
                self.width, self.height
            )));
        }
        let height = usize::try_from(self.height).map_err(|_| self.shape_mismatch())?;
        let width = usize::try_from(self.width).map_err(|_| self.shape_mismatch())?;
        if self.rows.len() != height || self.rows.iter().any(|row| row.chars().count() != width) {
            return Err(self.shape_mismatch());
        }

        let mut grid = Grid::new(self.width, self.height);
        for (y, row) in (0u32..).zip(&self.rows) {
            for (x, symbol) in (0u32..).zip(row.chars()) {
                let at = Coordinate::new(x, y);
                match symbol {
                    WALL_SYMBOL => {}
                    PATH_SYMBOL if !grid.is_boundary(at) => {
                        grid.set_path(at).map_err(|_| MazeTransferError::InvalidCell {
                            x,
                            y,
                            symbol,
                        })?;
                    }
                    _ => return Err(MazeTransferError::InvalidCell { x, y, symbol }),
                }
            }
        }

        Ok(grid)
    }

    /// Encodes the snapshot into a single-line share code.
    pub fn encode(&self) -> Result<String, MazeTransferError> {
        let payload = SerializableRows {
            rows: self.rows.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(MazeTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
            self.width, self.height
        ))
    }

    /// Decodes a snapshot from a share code.
    pub fn decode(value: &str) -> Result<Self, MazeTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MazeTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(MazeTransferError::MissingField("prefix"))?;
        let version = parts.next().ok_or(MazeTransferError::MissingField("version"))?;
        let dimensions = parts
            .next()
            .ok_or(MazeTransferError::MissingField("dimensions"))?;
        let payload = parts.next().ok_or(MazeTransferError::MissingField("payload"))?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(MazeTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(MazeTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(MazeTransferError::InvalidEncoding)?;
        let decoded: SerializableRows =
            serde_json::from_slice(&bytes).map_err(MazeTransferError::InvalidPayload)?;

        Ok(Self {
            width,
            height,
            rows: decoded.rows,
        })
    }

    fn shape_mismatch(&self) -> MazeTransferError {
        MazeTransferError::ShapeMismatch {
            width: self.width,
            height: self.height,
        }
    }
}

fn is_normalized(dimension: u32) -> bool {
    dimension >= MIN_DIMENSION && dimension % 2 == 1
}

fn parse_dimensions(value: &str) -> Result<(u32, u32), MazeTransferError> {
    let invalid = || MazeTransferError::InvalidDimensions(value.to_owned());
    let (width, height) = value.split_once('x').ok_or_else(invalid)?;
    let width = width.parse::<u32>().map_err(|_| invalid())?;
    let height = height.parse::<u32>().map_err(|_| invalid())?;
    Ok((width, height))
}

/// Output formats accepted by the `generate` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Rows of `#` and spaces, north at the top.
    Text,
    /// Pretty-printed JSON document.
    Json,
    /// Single-line share code accepted by `play --maze`.
    Code,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    seed: u64,
    path_cells: usize,
    maze: &'a MazeSnapshot,
}

/// Renders `grid` in the requested format.
pub fn export_maze(grid: &Grid, seed: u64, format: ExportFormat) -> anyhow::Result<String> {
    let snapshot = MazeSnapshot::capture(grid);
    let rendered = match format {
        ExportFormat::Text => Scene::new(grid, Vec::new(), Hud::default())
            .rows()
            .join("\n"),
        ExportFormat::Json => serde_json::to_string_pretty(&JsonExport {
            seed,
            path_cells: grid.path_count(),
            maze: &snapshot,
        })?,
        ExportFormat::Code => snapshot.encode()?,
    };
    Ok(rendered)
}

/// Errors raised while decoding a maze share code.
#[derive(Debug, Error)]
pub enum MazeTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("maze code was empty")]
    EmptyPayload,
    /// A colon-separated field was missing.
    #[error("maze code is missing the {0}")]
    MissingField(&'static str),
    /// The code did not start with the expected domain.
    #[error("maze prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The code used an unknown version identifier.
    #[error("maze version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions were not of the form `<W>x<H>` with odd sides of at
    /// least five cells.
    #[error("invalid maze dimensions '{0}'")]
    InvalidDimensions(String),
    /// The payload was not valid base64.
    #[error("could not decode maze payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload was not the expected JSON document.
    #[error("could not parse maze payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The rows do not match the declared size.
    #[error("maze rows do not describe a {width}x{height} grid")]
    ShapeMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// A row contained an unknown symbol or an open boundary cell.
    #[error("invalid maze cell '{symbol}' at ({x}, {y})")]
    InvalidCell {
        /// Column of the offending cell.
        x: u32,
        /// Row of the offending cell.
        y: u32,
        /// Symbol found in the row.
        symbol: char,
    },
}
