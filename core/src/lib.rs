#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rail Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rail Defence.";

/// Top-level game state gating which subsystems may mutate the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen; no session is in progress.
    MainMenu,
    /// "Get ready" countdown preceding the first build phase.
    Starting,
    /// Track construction is enabled and the mover is idle.
    BuildPhase,
    /// Track construction is disabled and the mover follows player input.
    ActionPhase,
    /// Time is suspended; the phase left behind is restored on resume.
    Paused,
    /// The session was lost.
    GameOver,
    /// The session was won.
    Victory,
}

impl Phase {
    /// Reports whether the phase is one of the two active gameplay phases.
    #[must_use]
    pub const fn is_gameplay(self) -> bool {
        matches!(self, Self::BuildPhase | Self::ActionPhase)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the cell grid using the provided dimensions.
    ConfigureTileGrid {
        /// Number of cells in each row.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
        /// Side length of each square cell measured in world units.
        tile_length: f32,
        /// Cells that may never be occupied.
        blocked: Vec<CellCoord>,
    },
    /// Resets the resource ledger to the provided balance and cell cost.
    ConfigureLedger {
        /// Balance available after the reset.
        balance: u32,
        /// Amount charged for occupying a single cell.
        cost_per_cell: u32,
    },
    /// Updates the mover's travel parameters.
    ConfigureMover {
        /// Travel speed in world units per second.
        speed: f32,
        /// Remaining distance below which the mover snaps onto its target.
        arrival_epsilon: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a cell join the network, or leave it when already occupied.
    OccupyCell {
        /// Cell that was clicked.
        cell: CellCoord,
    },
    /// Requests that an occupied cell leave the network with a full refund.
    FreeCell {
        /// Cell to release.
        cell: CellCoord,
    },
    /// Requests a transition into the provided phase.
    SetPhase {
        /// Phase the world should activate.
        phase: Phase,
    },
    /// Requests that a paused session return to the phase it was paused in.
    Resume,
    /// Requests that an idle mover depart toward the adjacent cell.
    SteerMover {
        /// Direction of travel.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports the ledger balance after a spend, credit or reset.
    ResourcesChanged {
        /// Balance after the change.
        balance: u32,
    },
    /// Announces the phase that became active. Always follows the phase-specific event.
    PhaseChanged {
        /// Newly active phase.
        phase: Phase,
    },
    /// The session returned to the main menu.
    MainMenuEntered,
    /// The pre-build countdown began.
    GameStarted,
    /// Track construction became available.
    BuildPhaseStarted,
    /// Traversal became available.
    ActionPhaseStarted,
    /// Time was suspended.
    GamePaused,
    /// Time resumed in the phase recorded at pause time.
    GameResumed,
    /// The session was lost.
    GameOver,
    /// The session was won.
    Victory,
    /// Confirms that a cell joined the network.
    CellOccupied {
        /// Cell that became occupied.
        cell: CellCoord,
    },
    /// Confirms that a cell left the network and was refunded.
    CellFreed {
        /// Cell that became free.
        cell: CellCoord,
    },
    /// Reports that an occupy request was rejected without side effects.
    PlacementRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a free request was rejected.
    FreeRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the release failed.
        reason: FreeError,
    },
    /// Reports that a phase transition was refused.
    TransitionRejected {
        /// Phase active when the request arrived.
        from: Phase,
        /// Phase that was requested.
        to: Phase,
        /// Specific reason the transition failed.
        reason: TransitionError,
    },
    /// Reports that a resume request was refused because the game is not paused.
    ResumeRejected {
        /// Phase active when the request arrived.
        phase: Phase,
        /// Specific reason the resume failed.
        reason: TransitionError,
    },
    /// Confirms that the mover was placed on its start cell.
    MoverSpawned {
        /// Cell the mover occupies.
        cell: CellCoord,
    },
    /// Reports that the mover could not be initialised and remains disabled.
    MoverUnavailable {
        /// Specific reason the mover could not spawn.
        reason: SpawnError,
    },
    /// Confirms that the mover committed to a destination.
    MoverDeparted {
        /// Cell the mover is leaving.
        from: CellCoord,
        /// Cell the mover is travelling to.
        to: CellCoord,
    },
    /// Confirms that the mover reached its destination and is idle again.
    MoverArrived {
        /// Cell the mover now occupies.
        cell: CellCoord,
    },
}

/// Cardinal travel directions available to the mover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices, away from the base row.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing row indices, toward the base row.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Column and row offsets associated with the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell. Row zero is the base row.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Returns the neighbouring cell in the provided direction.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }
}

/// Immutable representation of the mover used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoverSnapshot {
    /// Cell the mover occupies or last departed from.
    pub current: CellCoord,
    /// Cell the mover is travelling to, `None` while idle at a node.
    pub target: Option<CellCoord>,
    /// World-space position of the mover as `(x, y)`.
    pub position: (f32, f32),
}

impl MoverSnapshot {
    /// Reports whether the mover is idle at a node and ready for input.
    #[must_use]
    pub const fn is_at_node(&self) -> bool {
        self.target.is_none()
    }
}

/// Read-only flags describing a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    /// Coordinates assigned to the cell.
    pub coord: CellCoord,
    /// Whether the cell is part of the network.
    pub occupied: bool,
    /// Whether the cell is eligible for placement at all.
    pub placeable: bool,
}

/// Reasons an occupy request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementError {
    /// The simulation is not in the build phase, so placement is disabled.
    #[error("placement is only available during the build phase")]
    NotBuildPhase,
    /// The requested cell lies outside the configured grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The first-row, adjacency or placeable rule was violated.
    #[error("cell must be placeable and adjacent to the network (or on row 0 when empty)")]
    InvalidPlacement,
    /// The ledger cannot cover the cell cost.
    #[error("not enough resources: need {required}, have {available}")]
    InsufficientResources {
        /// Cost of the requested cell.
        required: u32,
        /// Balance at the time of the request.
        available: u32,
    },
}

/// Reasons a free request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum FreeError {
    /// The simulation is not in the build phase, so the network is frozen.
    #[error("freeing cells is only available during the build phase")]
    NotBuildPhase,
    /// The cell is not part of the network.
    #[error("cell is not part of the network")]
    NotInNetwork,
}

/// Reasons the mover may fail to initialise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum SpawnError {
    /// No occupied cell exists on the base row.
    #[error("no occupied cell on row 0 to start from")]
    NoStartCell,
}

/// Reasons a phase transition may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum TransitionError {
    /// The transition table does not permit the requested edge.
    #[error("cannot transition from {from:?} to {to:?}")]
    Illegal {
        /// Phase active when the request arrived.
        from: Phase,
        /// Phase that was requested.
        to: Phase,
    },
    /// The occupied cells do not form a single connected component.
    #[error("track network is not connected")]
    NetworkDisconnected,
    /// Resume was requested while no phase is paused.
    #[error("cannot resume from {current:?}; the game is not paused")]
    NotPaused {
        /// Phase active when the request arrived.
        current: Phase,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, Event, Phase, PlacementError, TransitionError};
    use std::time::Duration;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn adjacency_rejects_diagonals_and_identity() {
        let origin = CellCoord::new(2, 2);
        assert!(origin.is_adjacent(CellCoord::new(3, 2)));
        assert!(origin.is_adjacent(CellCoord::new(2, 1)));
        assert!(!origin.is_adjacent(CellCoord::new(3, 3)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn step_follows_row_axis_upward_for_north() {
        let origin = CellCoord::new(1, 1);
        assert_eq!(origin.step(Direction::North), Some(CellCoord::new(1, 2)));
        assert_eq!(origin.step(Direction::South), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(2, 1)));
        assert_eq!(origin.step(Direction::West), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn step_off_the_quadrant_yields_none() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::South), None);
    }

    #[test]
    fn only_build_and_action_are_gameplay_phases() {
        assert!(Phase::BuildPhase.is_gameplay());
        assert!(Phase::ActionPhase.is_gameplay());
        assert!(!Phase::Paused.is_gameplay());
        assert!(!Phase::MainMenu.is_gameplay());
    }

    #[test]
    fn rejection_events_round_trip_through_bincode() {
        let events = vec![
            Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            },
            Event::PlacementRejected {
                cell: CellCoord::new(3, 2),
                reason: PlacementError::InsufficientResources {
                    required: 1,
                    available: 0,
                },
            },
            Event::TransitionRejected {
                from: Phase::BuildPhase,
                to: Phase::ActionPhase,
                reason: TransitionError::NetworkDisconnected,
            },
        ];

        let bytes = bincode::serialize(&events).expect("serialize");
        let restored: Vec<Event> = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, events);
    }

    #[test]
    fn placement_error_messages_carry_amounts() {
        let error = PlacementError::InsufficientResources {
            required: 2,
            available: 1,
        };
        assert_eq!(error.to_string(), "not enough resources: need 2, have 1");
    }
}
