#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver for the labyrinth: headless sessions, maze export and
//! the high-score records file.

pub mod config;
pub mod input;
pub mod maze_transfer;
pub mod records;
pub mod simulation;

use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::{Context, Result as AnyResult};
use labyrinth_core::{Grid, SeededRandom};
use labyrinth_rendering::TextBackend;
use labyrinth_system_bootstrap as bootstrap;
use labyrinth_system_maze_generation::MazeGenerator;
use labyrinth_system_navigation as navigation;
use tracing::info;

use config::{Cli, CliCommand, GenerateArgs, PlayArgs, RecordsArgs};
use input::{Autopilot, PlayerInput, ScriptedInput};
use maze_transfer::{export_maze, MazeSnapshot};
use records::{JsonRecordStore, RecordStore};
use simulation::{Simulation, SimulationConfig};

const AUTOPILOT_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Executes the parsed command line, writing user-facing output to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> AnyResult<()> {
    match cli.command {
        CliCommand::Play(args) => play(&args, out),
        CliCommand::Generate(args) => generate(args, out),
        CliCommand::Records(args) => list_records(&args, out),
    }
}

fn play<W: Write>(args: &PlayArgs, out: &mut W) -> AnyResult<()> {
    let seed = args.maze.resolve_seed();
    info!(seed, name = %args.name, "starting session");

    let input = match &args.script {
        Some(script) => {
            PlayerInput::Scripted(ScriptedInput::parse(script).context("invalid input script")?)
        }
        None => PlayerInput::Autopilot(Autopilot::new(seed ^ AUTOPILOT_SALT, args.autopilot_hold)),
    };
    let config = SimulationConfig {
        frame: Duration::from_millis(args.frame_ms),
        bootstrap: bootstrap::Config::new(args.maze.width, args.maze.height),
        navigation: navigation::Config::new(Some(args.pursuit_threshold)),
        ..SimulationConfig::default()
    };
    let random = SeededRandom::new(seed);

    let mut simulation = match &args.maze_code {
        Some(code) => {
            let grid = MazeSnapshot::decode(code)
                .and_then(|snapshot| snapshot.to_grid())
                .context("invalid maze code")?;
            Simulation::with_grid(config, grid, random, input)
        }
        None => Simulation::new(config, random, input),
    }
    .context("could not open a level")?;

    writeln!(out, "{}", simulation.welcome_banner())?;
    let summary = {
        let mut backend = TextBackend::new(&mut *out);
        simulation.run(args.frames, args.present_every, &mut backend)?
    };

    match summary.outcome {
        Some(outcome) => {
            writeln!(
                out,
                "Caught by the {} after {} frames with {} coins.",
                outcome.caught_by(),
                summary.frames,
                outcome.coins_collected()
            )?;
            if !args.no_record {
                let mut store = JsonRecordStore::new(&args.records);
                store.append_record(&args.name, outcome.coins_collected())?;
                info!(path = %store.path().display(), "record saved");
            }
        }
        None => writeln!(
            out,
            "Escaped for {} frames with {} coins.",
            summary.frames, summary.coins_collected
        )?,
    }
    Ok(())
}

fn generate<W: Write>(args: GenerateArgs, out: &mut W) -> AnyResult<()> {
    let seed = args.maze.resolve_seed();
    let mut grid = Grid::new(args.maze.width, args.maze.height);
    let report = MazeGenerator::new().generate(&mut grid, &mut SeededRandom::new(seed));
    info!(seed, carved = report.carved, "maze generated");

    writeln!(out, "{}", export_maze(&grid, seed, args.format)?)?;
    Ok(())
}

fn list_records<W: Write>(args: &RecordsArgs, out: &mut W) -> AnyResult<()> {
    let store = JsonRecordStore::new(&args.records);
    let records = store.load_records()?;
    if records.is_empty() {
        writeln!(out, "No records yet.")?;
        return Ok(());
    }

    let limit = args.limit.unwrap_or(records.len());
    for (rank, entry) in records.iter().take(limit).enumerate() {
        writeln!(
            out,
            "{:>3}. {:<20} {:>5}",
            rank + 1,
            entry.user_name,
            entry.collected_coins
        )?;
    }
    Ok(())
}

/// Convenience wrapper writing to standard output.
pub fn run_to_stdout(cli: Cli) -> AnyResult<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run(cli, &mut handle)
}
