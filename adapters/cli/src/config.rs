//! Command-line arguments with environment fallbacks.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::maze_transfer::ExportFormat;

const DEFAULT_WIDTH: u32 = 21;
const DEFAULT_HEIGHT: u32 = 15;
const DEFAULT_RECORDS: &str = "labyrinth-records.json";

/// Procedural labyrinth with coin-hunting zombies and mummies.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", version)]
pub struct Cli {
    /// Action to perform.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Top-level actions.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Simulate a session and record the score when the player is caught.
    Play(PlayArgs),
    /// Generate a maze and print it.
    Generate(GenerateArgs),
    /// List recorded scores, most coins first.
    Records(RecordsArgs),
}

/// Maze generation parameters shared by `play` and `generate`.
#[derive(Clone, Copy, Debug, Args)]
pub struct MazeArgs {
    /// Seed for the deterministic random source. Drawn from entropy when absent.
    #[arg(long, env = "LABYRINTH_SEED")]
    pub seed: Option<u64>,
    /// Requested maze width; raised to an odd value of at least 5.
    #[arg(long, env = "LABYRINTH_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: u32,
    /// Requested maze height; raised to an odd value of at least 5.
    #[arg(long, env = "LABYRINTH_HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
}

impl MazeArgs {
    /// Seed to use for this run.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Arguments of the `play` command.
#[derive(Clone, Debug, Args)]
pub struct PlayArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub maze: MazeArgs,
    /// Name stored with the score.
    #[arg(long, default_value = "player")]
    pub name: String,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 2_000)]
    pub frames: u64,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 50)]
    pub frame_ms: u64,
    /// Directions fed to the player, one per frame (`N`, `S`, `E`, `W`, `.`).
    /// The autopilot drives the player when absent.
    #[arg(long)]
    pub script: Option<String>,
    /// Frames between autopilot direction changes.
    #[arg(long, default_value_t = 8)]
    pub autopilot_hold: u32,
    /// Share code of a maze to play instead of generating one.
    #[arg(long = "maze")]
    pub maze_code: Option<String>,
    /// Print the maze every N frames; zero prints only the final frame.
    #[arg(long, default_value_t = 0)]
    pub present_every: u64,
    /// Coins collected before enemies start pursuing the player.
    #[arg(long, default_value_t = 20)]
    pub pursuit_threshold: u32,
    /// Records file updated when the session ends.
    #[arg(long, env = "LABYRINTH_RECORDS", default_value = DEFAULT_RECORDS)]
    pub records: PathBuf,
    /// Do not write the score to the records file.
    #[arg(long)]
    pub no_record: bool,
}

/// Arguments of the `generate` command.
#[derive(Clone, Copy, Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub maze: MazeArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
    pub format: ExportFormat,
}

/// Arguments of the `records` command.
#[derive(Clone, Debug, Args)]
pub struct RecordsArgs {
    /// Records file to read.
    #[arg(long, env = "LABYRINTH_RECORDS", default_value = DEFAULT_RECORDS)]
    pub records: PathBuf,
    /// Show at most this many entries.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn play_accepts_a_script_and_seed() {
        let cli = Cli::try_parse_from([
            "labyrinth",
            "play",
            "--seed",
            "7",
            "--script",
            "EEN",
            "--frames",
            "30",
            "--no-record",
        ])
        .expect("valid arguments");

        let CliCommand::Play(args) = cli.command else {
            panic!("expected play command");
        };
        assert_eq!(args.maze.seed, Some(7));
        assert_eq!(args.maze.resolve_seed(), 7);
        assert_eq!(args.script.as_deref(), Some("EEN"));
        assert_eq!(args.frames, 30);
        assert!(args.no_record);
    }

    #[test]
    fn generate_parses_the_export_format() {
        let cli = Cli::try_parse_from(["labyrinth", "generate", "--format", "code", "--width", "9"])
            .expect("valid arguments");

        let CliCommand::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.format, ExportFormat::Code);
        assert_eq!(args.maze.width, 9);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["labyrinth", "generate", "--format", "svg"]).is_err());
    }
}
