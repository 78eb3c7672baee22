#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-phase system responsible for emitting track placement commands.

use rail_defence_core::{CellCoord, Command, Event, Phase};
use tracing::debug;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Cell clicked by the player on this frame, if any.
    pub clicked_cell: Option<CellCoord>,
    /// Indicates whether the player pressed the "begin action phase" trigger.
    pub begin_action: bool,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(clicked_cell: Option<CellCoord>, begin_action: bool) -> Self {
        Self {
            clicked_cell,
            begin_action,
        }
    }
}

/// Build-phase system that translates clicks and the UI trigger into commands.
#[derive(Debug, Clone)]
pub struct Builder {
    phase: Phase,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::MainMenu,
        }
    }

    /// Phase most recently observed through [`Event::PhaseChanged`].
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// Clicks become [`Command::OccupyCell`], which frees already occupied
    /// cells. The `is_network_connected` closure should mirror the world's
    /// `query::is_network_connected` helper; the action phase is only requested
    /// when it reports a single connected track.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        is_network_connected: F,
        out: &mut Vec<Command>,
    ) where
        F: FnOnce() -> bool,
    {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if self.phase != Phase::BuildPhase {
            return;
        }

        if let Some(cell) = input.clicked_cell {
            out.push(Command::OccupyCell { cell });
        }

        if input.begin_action {
            if is_network_connected() {
                out.push(Command::SetPhase {
                    phase: Phase::ActionPhase,
                });
            } else {
                debug!("track is not connected; staying in build phase");
            }
        }
    }
}
