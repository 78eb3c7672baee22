#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that turns raw directional input into mover steering commands.

use glam::Vec2;
use rail_defence_core::{Command, Direction, Event, MoverSnapshot, Phase};
use tracing::trace;

/// Input magnitude required to leave a node when no configuration is applied.
pub const DEFAULT_INPUT_THRESHOLD: f32 = 0.5;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    input_threshold: f32,
}

impl Config {
    /// Creates a new configuration using the provided input dead zone.
    #[must_use]
    pub const fn new(input_threshold: f32) -> Self {
        Self { input_threshold }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_THRESHOLD)
    }
}

/// Pure system that reacts to world events and emits steering commands.
#[derive(Debug)]
pub struct Movement {
    phase: Phase,
    input_threshold: f32,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            phase: Phase::MainMenu,
            input_threshold: config.input_threshold,
        }
    }

    /// Consumes world events, the mover snapshot and this tick's input vector.
    ///
    /// Emits at most one [`Command::SteerMover`], and only while the action
    /// phase is active and the mover is idle at a node. Input while the mover
    /// is travelling is discarded.
    pub fn handle(
        &mut self,
        events: &[Event],
        mover: Option<&MoverSnapshot>,
        input: Vec2,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if self.phase != Phase::ActionPhase {
            return;
        }

        let Some(mover) = mover else {
            return;
        };
        if !mover.is_at_node() {
            return;
        }

        if let Some(direction) = dominant_direction(input, self.input_threshold) {
            trace!(?direction, "steering mover");
            out.push(Command::SteerMover { direction });
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Maps an input vector onto a cardinal direction.
///
/// Vectors shorter than `threshold` yield `None`. The larger absolute axis
/// wins; ties resolve to the vertical axis.
#[must_use]
pub fn dominant_direction(input: Vec2, threshold: f32) -> Option<Direction> {
    if input.length() < threshold {
        return None;
    }

    let direction = if input.x.abs() > input.y.abs() {
        if input.x > 0.0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if input.y > 0.0 {
        Direction::North
    } else {
        Direction::South
    };
    Some(direction)
}
