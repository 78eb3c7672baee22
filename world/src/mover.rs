//! Node-to-node traversal state machine.

use std::time::Duration;

use glam::Vec2;
use rail_defence_core::{CellCoord, Direction, MoverSnapshot};

use crate::grid::GridTopology;

/// Result of advancing the mover by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
    Idle,
    Travelling,
    Arrived(CellCoord),
}

/// Mover travelling along occupied cells.
///
/// `target` is `None` while the mover sits idle at `current` (AtNode) and
/// holds the destination while in transit (Moving). Once departed the mover
/// always completes the hop.
#[derive(Clone, Debug)]
pub(crate) struct TrackMover {
    current: CellCoord,
    target: Option<CellCoord>,
    position: Vec2,
}

impl TrackMover {
    pub(crate) fn spawn(cell: CellCoord, grid: &GridTopology) -> Self {
        Self {
            current: cell,
            target: None,
            position: grid.cell_center(cell),
        }
    }

    pub(crate) const fn current(&self) -> CellCoord {
        self.current
    }

    /// Cell the mover is committed to: its hop target, or its resting cell.
    pub(crate) fn anchor(&self) -> CellCoord {
        self.target.unwrap_or(self.current)
    }

    pub(crate) const fn is_at_node(&self) -> bool {
        self.target.is_none()
    }

    pub(crate) fn snapshot(&self) -> MoverSnapshot {
        MoverSnapshot {
            current: self.current,
            target: self.target,
            position: (self.position.x, self.position.y),
        }
    }

    /// Commits to the neighbouring cell in `direction` when it is occupied.
    ///
    /// Returns the chosen target, or `None` when the mover is in transit or the
    /// neighbour is missing or free.
    pub(crate) fn steer(&mut self, direction: Direction, grid: &GridTopology) -> Option<CellCoord> {
        if !self.is_at_node() {
            return None;
        }

        let candidate = self.current.step(direction)?;
        let cell = grid.cell(candidate)?;
        if !cell.occupied {
            return None;
        }

        self.target = Some(candidate);
        Some(candidate)
    }

    /// Moves toward the target at `speed` world units per second, snapping once
    /// the remaining distance drops below `epsilon`.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        speed: f32,
        epsilon: f32,
        grid: &GridTopology,
    ) -> Progress {
        let Some(target) = self.target else {
            return Progress::Idle;
        };

        let destination = grid.cell_center(target);
        self.position = move_towards(self.position, destination, speed * dt.as_secs_f32());

        if self.position.distance(destination) <= epsilon {
            self.position = destination;
            self.current = target;
            self.target = None;
            return Progress::Arrived(target);
        }

        Progress::Travelling
    }
}

fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        to
    } else {
        from + delta / distance * max_step
    }
}
