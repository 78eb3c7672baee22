//! Occupied-cell network together with its placement and connectivity rules.

use std::collections::VecDeque;

use rail_defence_core::{CellCoord, Event, FreeError, Phase, PlacementError};
use tracing::{debug, warn};

use crate::{
    grid::GridTopology,
    ledger::{LedgerError, ResourceLedger},
};

/// Ordered collection of occupied cells.
///
/// Insertion order is preserved; it decides the default breadth-first seed and
/// the mover's start cell. Every member has `occupied = true` in the grid and
/// appears once.
#[derive(Clone, Debug, Default)]
pub(crate) struct NetworkState {
    cells: Vec<CellCoord>,
}

impl NetworkState {
    pub(crate) fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    pub(crate) fn contains(&self, coord: CellCoord) -> bool {
        self.cells.contains(&coord)
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
    }

    /// First member lying on the base row.
    pub(crate) fn start_cell(&self) -> Option<CellCoord> {
        self.cells.iter().copied().find(|cell| cell.row() == 0)
    }

    fn push(&mut self, coord: CellCoord) {
        debug_assert!(!self.contains(coord), "cell {coord:?} already in network");
        self.cells.push(coord);
    }

    fn remove(&mut self, coord: CellCoord) -> bool {
        match self.cells.iter().position(|cell| *cell == coord) {
            Some(index) => {
                let _ = self.cells.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Outcome of a successful occupy request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Occupancy {
    Occupied,
    Freed,
}

/// Decides whether `candidate` may join the network.
///
/// An empty network only accepts cells on row 0; otherwise the candidate must
/// share an edge with an occupied cell. The cell must also be placeable.
/// Cells outside the grid are never valid.
pub(crate) fn is_valid_placement(
    candidate: CellCoord,
    network: &NetworkState,
    grid: &GridTopology,
) -> bool {
    let Some(cell) = grid.cell(candidate) else {
        return false;
    };
    if !cell.placeable {
        return false;
    }

    if network.cells.is_empty() {
        return candidate.row() == 0;
    }

    network
        .cells
        .iter()
        .any(|existing| existing.is_adjacent(candidate))
}

/// Reports whether every occupied cell reaches every other under 4-directional adjacency.
///
/// Breadth-first search seeded from the first member, rescanning the whole
/// network for each dequeued cell.
pub(crate) fn is_connected(cells: &[CellCoord]) -> bool {
    if cells.len() <= 1 {
        return true;
    }

    let mut visited = vec![false; cells.len()];
    let mut visited_count = 1;
    let mut queue = VecDeque::with_capacity(cells.len());
    visited[0] = true;
    queue.push_back(cells[0]);

    while let Some(current) = queue.pop_front() {
        for (index, candidate) in cells.iter().enumerate() {
            if visited[index] || !candidate.is_adjacent(current) {
                continue;
            }

            visited[index] = true;
            visited_count += 1;
            queue.push_back(*candidate);
        }
    }

    visited_count == cells.len()
}

/// Handles a cell click: frees an occupied cell during the build phase,
/// otherwise validates, charges and occupies it.
///
/// A rejection leaves the grid, network and ledger untouched.
pub(crate) fn attempt_occupy(
    coord: CellCoord,
    phase: Phase,
    grid: &mut GridTopology,
    network: &mut NetworkState,
    ledger: &mut ResourceLedger,
    out_events: &mut Vec<Event>,
) -> Result<Occupancy, PlacementError> {
    if phase != Phase::BuildPhase {
        return Err(PlacementError::NotBuildPhase);
    }

    let occupied = grid
        .cell(coord)
        .map(|cell| cell.occupied)
        .ok_or(PlacementError::OutOfBounds)?;

    if occupied {
        return match free(coord, phase, grid, network, ledger, out_events) {
            Ok(()) => Ok(Occupancy::Freed),
            Err(error) => {
                // Occupancy flag and network disagree; treat the click as a placement.
                warn!(?coord, %error, "occupied cell missing from network");
                Err(PlacementError::InvalidPlacement)
            }
        };
    }

    if !is_valid_placement(coord, network, grid) {
        debug!(?coord, "cell must be adjacent to the network or on row 0");
        return Err(PlacementError::InvalidPlacement);
    }

    let cost = ledger.cost_per_cell();
    if let Err(LedgerError::Insufficient {
        required,
        available,
    }) = ledger.spend(cost, out_events)
    {
        return Err(PlacementError::InsufficientResources {
            required,
            available,
        });
    }

    if let Some(cell) = grid.cell_mut(coord) {
        cell.occupied = true;
    }
    network.push(coord);
    Ok(Occupancy::Occupied)
}

/// Removes `coord` from the network with a full refund.
///
/// The network is frozen outside the build phase.
pub(crate) fn free(
    coord: CellCoord,
    phase: Phase,
    grid: &mut GridTopology,
    network: &mut NetworkState,
    ledger: &mut ResourceLedger,
    out_events: &mut Vec<Event>,
) -> Result<(), FreeError> {
    if phase != Phase::BuildPhase {
        return Err(FreeError::NotBuildPhase);
    }

    if !network.remove(coord) {
        return Err(FreeError::NotInNetwork);
    }

    if let Some(cell) = grid.cell_mut(coord) {
        cell.occupied = false;
    }
    let refund = ledger.cost_per_cell();
    let _ = ledger.credit(refund, out_events);
    Ok(())
}
