#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Rail Defence session.

mod render;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use rail_defence_core::{CellCoord, Direction, Event, Phase};
use rail_defence_system_bootstrap::{GameConfig, Simulation};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Upper bound on ticks spent waiting for the countdown to finish.
const MAX_COUNTDOWN_TICKS: u32 = 10_000;

#[derive(Debug, Parser)]
#[command(name = "rail-defence", about = "Build a track, then ride it.")]
struct CliArgs {
    /// Path to a TOML configuration file. Defaults to `rail-defence.toml` when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Cells to click during the build phase, e.g. "0,0;1,0;1,1".
    #[arg(long, value_name = "CELLS", value_delimiter = ';', value_parser = parse_cell)]
    place: Vec<CellCoord>,

    /// Directions to steer during the action phase, e.g. "E,N,N".
    #[arg(long, value_name = "DIRS", value_delimiter = ',', value_parser = parse_direction)]
    steer: Vec<Direction>,

    /// Ticks simulated after each steering input.
    #[arg(long, default_value_t = 10)]
    ticks_per_step: u32,

    /// Length of a single tick in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
}

/// Entry point for the Rail Defence command-line interface.
fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse();

    let config = load_config(args.config.as_deref())?;
    let dt = Duration::from_millis(args.tick_ms);
    let mut simulation = Simulation::new(&config);
    println!("{}", simulation.banner());

    let _ = simulation.subscribe(|event| {
        if !matches!(event, Event::TimeAdvanced { .. }) {
            println!("  {event:?}");
        }
    });

    let _ = simulation.start();
    let mut waited = 0;
    while simulation.phase() == Phase::Starting && waited < MAX_COUNTDOWN_TICKS {
        let _ = simulation.tick(dt, Vec2::ZERO);
        waited += 1;
    }

    for cell in &args.place {
        let _ = simulation.click(*cell);
    }
    info!(
        balance = simulation.balance(),
        cells = simulation.network().len(),
        "build phase finished"
    );

    let _ = simulation.begin_action_phase();
    if simulation.phase() == Phase::ActionPhase {
        for direction in &args.steer {
            steer(&mut simulation, *direction, dt, args.ticks_per_step);
        }
    } else {
        warn!("track is not connected; skipping the action phase");
    }

    let mover = simulation.mover().map(|mover| mover.current);
    println!(
        "{}",
        render::render_grid(simulation.dimensions(), &simulation.cells(), mover)
    );
    println!("balance: {}", simulation.balance());
    Ok(())
}

fn steer(simulation: &mut Simulation, direction: Direction, dt: Duration, ticks: u32) {
    let (dx, dy) = direction.offset();
    let input = Vec2::new(dx as f32, dy as f32);
    let _ = simulation.tick(dt, input);
    for _ in 1..ticks {
        let _ = simulation.tick(dt, Vec2::ZERO);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path),
        None => {
            let fallback = GameConfig::default_path();
            if fallback.exists() {
                GameConfig::load(&fallback)
                    .with_context(|| format!("failed to load {}", fallback.display()))
            } else {
                Ok(GameConfig::default())
            }
        }
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"column,row\", got {value:?}"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|error| format!("invalid column in {value:?}: {error}"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|error| format!("invalid row in {value:?}: {error}"))?;
    Ok(CellCoord::new(column, row))
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "N" | "NORTH" => Ok(Direction::North),
        "E" | "EAST" => Ok(Direction::East),
        "S" | "SOUTH" => Ok(Direction::South),
        "W" | "WEST" => Ok(Direction::West),
        other => Err(format!("unknown direction {other:?}; use N, E, S or W")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_parse_with_whitespace() {
        assert_eq!(parse_cell(" 3 , 4"), Ok(CellCoord::new(3, 4)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("-1,0").is_err());
    }

    #[test]
    fn directions_accept_short_and_long_names() {
        assert_eq!(parse_direction("e"), Ok(Direction::East));
        assert_eq!(parse_direction("North"), Ok(Direction::North));
        assert!(parse_direction("up").is_err());
    }

    #[test]
    fn script_arguments_split_on_delimiters() {
        let args = CliArgs::try_parse_from([
            "rail-defence",
            "--place",
            "0,0;1,0",
            "--steer",
            "E,W",
        ])
        .expect("valid arguments");

        assert_eq!(args.place, vec![CellCoord::new(0, 0), CellCoord::new(1, 0)]);
        assert_eq!(args.steer, vec![Direction::East, Direction::West]);
        assert_eq!(args.ticks_per_step, 10);
    }
}
