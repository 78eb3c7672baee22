#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rail Defence.

mod grid;
mod ledger;
mod mover;
mod network;
mod phase;

use std::time::Duration;

use rail_defence_core::{CellCoord, Command, Direction, Event, Phase, SpawnError, WELCOME_BANNER};
use tracing::{debug, info, warn};

use crate::{
    grid::GridTopology,
    ledger::ResourceLedger,
    mover::{Progress, TrackMover},
    network::{NetworkState, Occupancy},
    phase::{PhaseController, Transition},
};

/// Number of cells in each row when no configuration is applied.
pub const DEFAULT_GRID_COLUMNS: u32 = 7;
/// Number of rows when no configuration is applied.
pub const DEFAULT_GRID_ROWS: u32 = 7;
/// Side length of a cell in world units when no configuration is applied.
pub const DEFAULT_TILE_LENGTH: f32 = 1.0;
/// Starting balance when no configuration is applied.
pub const DEFAULT_STARTING_RESOURCES: u32 = 10;
/// Cost of a single cell when no configuration is applied.
pub const DEFAULT_COST_PER_CELL: u32 = 1;
/// Mover speed in world units per second when no configuration is applied.
pub const DEFAULT_MOVER_SPEED: f32 = 5.0;
/// Snap distance for mover arrival when no configuration is applied.
pub const DEFAULT_ARRIVAL_EPSILON: f32 = 0.01;

/// Represents the authoritative Rail Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridTopology,
    network: NetworkState,
    ledger: ResourceLedger,
    starting_resources: u32,
    phase: PhaseController,
    mover: Option<TrackMover>,
    mover_speed: f32,
    arrival_epsilon: f32,
    tick_index: u64,
}

impl World {
    /// Creates a new Rail Defence world sitting in the main menu.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: GridTopology::new(
                DEFAULT_GRID_COLUMNS,
                DEFAULT_GRID_ROWS,
                DEFAULT_TILE_LENGTH,
                &[],
            ),
            network: NetworkState::default(),
            ledger: ResourceLedger::new(DEFAULT_STARTING_RESOURCES, DEFAULT_COST_PER_CELL),
            starting_resources: DEFAULT_STARTING_RESOURCES,
            phase: PhaseController::default(),
            mover: None,
            mover_speed: DEFAULT_MOVER_SPEED,
            arrival_epsilon: DEFAULT_ARRIVAL_EPSILON,
            tick_index: 0,
        }
    }

    fn is_network_connected(&self) -> bool {
        network::is_connected(self.network.cells())
    }

    fn set_phase(&mut self, to: Phase, out_events: &mut Vec<Event>) {
        let from = self.phase.current();
        let network = &self.network;
        let result = self
            .phase
            .transition(to, || network::is_connected(network.cells()), out_events);

        match result {
            Ok(Transition::Entered(phase)) => self.on_enter(phase, out_events),
            Ok(Transition::Unchanged) => {}
            Err(reason) => {
                warn!(?from, ?to, %reason, "phase transition refused");
                out_events.push(Event::TransitionRejected { from, to, reason });
            }
        }
    }

    fn on_enter(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        match phase {
            Phase::BuildPhase => {
                out_events.push(Event::ResourcesChanged {
                    balance: self.ledger.balance(),
                });
            }
            Phase::ActionPhase => self.ensure_mover(out_events),
            Phase::MainMenu => self.end_session(out_events),
            Phase::Starting | Phase::Paused | Phase::GameOver | Phase::Victory => {}
        }
    }

    fn ensure_mover(&mut self, out_events: &mut Vec<Event>) {
        if let Some(mover) = &self.mover {
            if self.network.contains(mover.anchor()) {
                return;
            }
            debug!(cell = ?mover.anchor(), "mover cell was freed; re-seating");
        }

        match self.network.start_cell() {
            Some(cell) => {
                self.mover = Some(TrackMover::spawn(cell, &self.grid));
                info!(?cell, "mover spawned");
                out_events.push(Event::MoverSpawned { cell });
            }
            None => {
                self.mover = None;
                warn!("mover could not find an occupied cell on row 0");
                out_events.push(Event::MoverUnavailable {
                    reason: SpawnError::NoStartCell,
                });
            }
        }
    }

    fn end_session(&mut self, out_events: &mut Vec<Event>) {
        self.network.clear();
        self.grid.clear_occupancy();
        self.mover = None;
        self.ledger = ResourceLedger::new(self.starting_resources, self.ledger.cost_per_cell());
        out_events.push(Event::ResourcesChanged {
            balance: self.ledger.balance(),
        });
    }

    fn refund_network(&mut self, out_events: &mut Vec<Event>) {
        let cells = u32::try_from(self.network.cells().len()).unwrap_or(u32::MAX);
        self.network.clear();
        if cells == 0 {
            return;
        }

        let refund = self.ledger.cost_per_cell().saturating_mul(cells);
        info!(cells, refund, "grid reconfigured; refunding track");
        let _ = self.ledger.credit(refund, out_events);
    }

    fn occupy(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let result = network::attempt_occupy(
            cell,
            self.phase.current(),
            &mut self.grid,
            &mut self.network,
            &mut self.ledger,
            out_events,
        );

        match result {
            Ok(Occupancy::Occupied) => {
                debug!(?cell, "cell occupied");
                out_events.push(Event::CellOccupied { cell });
            }
            Ok(Occupancy::Freed) => {
                debug!(?cell, "cell freed");
                out_events.push(Event::CellFreed { cell });
            }
            Err(reason) => {
                warn!(?cell, %reason, "placement rejected");
                out_events.push(Event::PlacementRejected { cell, reason });
            }
        }
    }

    fn free(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let result = network::free(
            cell,
            self.phase.current(),
            &mut self.grid,
            &mut self.network,
            &mut self.ledger,
            out_events,
        );

        match result {
            Ok(()) => out_events.push(Event::CellFreed { cell }),
            Err(reason) => {
                warn!(?cell, %reason, "free rejected");
                out_events.push(Event::FreeRejected { cell, reason });
            }
        }
    }

    fn steer(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.phase.current() != Phase::ActionPhase {
            return;
        }

        let Some(mover) = self.mover.as_mut() else {
            return;
        };

        let from = mover.current();
        match mover.steer(direction, &self.grid) {
            Some(to) => out_events.push(Event::MoverDeparted { from, to }),
            None => debug!(?direction, ?from, "no track in that direction"),
        }
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.phase.time_flows() {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        // A hop in flight is held, not reset, outside the action phase.
        if self.phase.current() != Phase::ActionPhase {
            return;
        }

        if let Some(mover) = self.mover.as_mut() {
            if let Progress::Arrived(cell) =
                mover.advance(dt, self.mover_speed, self.arrival_epsilon, &self.grid)
            {
                debug!(?cell, "mover arrived");
                out_events.push(Event::MoverArrived { cell });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureTileGrid {
            columns,
            rows,
            tile_length,
            blocked,
        } => {
            world.grid = GridTopology::new(columns, rows, tile_length, &blocked);
            world.refund_network(out_events);
            world.mover = None;
        }
        Command::ConfigureLedger {
            balance,
            cost_per_cell,
        } => {
            world.starting_resources = balance;
            world.ledger = ResourceLedger::new(balance, cost_per_cell);
            out_events.push(Event::ResourcesChanged { balance });
        }
        Command::ConfigureMover {
            speed,
            arrival_epsilon,
        } => {
            world.mover_speed = speed;
            world.arrival_epsilon = arrival_epsilon;
        }
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::OccupyCell { cell } => world.occupy(cell, out_events),
        Command::FreeCell { cell } => world.free(cell, out_events),
        Command::SetPhase { phase } => world.set_phase(phase, out_events),
        Command::Resume => {
            let phase = world.phase.current();
            if let Err(reason) = world.phase.resume(out_events) {
                warn!(?phase, %reason, "resume refused");
                out_events.push(Event::ResumeRejected { phase, reason });
            }
        }
        Command::SteerMover { direction } => world.steer(direction, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rail_defence_core::{CellCoord, CellSnapshot, MoverSnapshot, Phase};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Currently active phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase.current()
    }

    /// Current resource balance.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.ledger.balance()
    }

    /// Amount charged for a single cell.
    #[must_use]
    pub fn cost_per_cell(world: &World) -> u32 {
        world.ledger.cost_per_cell()
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.columns(), world.grid.rows())
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub fn tile_length(world: &World) -> f32 {
        world.grid.tile_length()
    }

    /// Flags of the cell at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn cell(world: &World, coord: CellCoord) -> Option<CellSnapshot> {
        world.grid.cell(coord).map(|cell| cell.snapshot())
    }

    /// Flags of every cell in row-major order.
    #[must_use]
    pub fn cells(world: &World) -> Vec<CellSnapshot> {
        world.grid.cells().iter().map(|cell| cell.snapshot()).collect()
    }

    /// Reports whether the cell at `coord` is part of the network.
    #[must_use]
    pub fn is_occupied(world: &World, coord: CellCoord) -> bool {
        world.grid.cell(coord).is_some_and(|cell| cell.occupied)
    }

    /// Occupied cells in insertion order.
    #[must_use]
    pub fn network(world: &World) -> &[CellCoord] {
        world.network.cells()
    }

    /// Reports whether the occupied cells form a single connected component.
    #[must_use]
    pub fn is_network_connected(world: &World) -> bool {
        world.is_network_connected()
    }

    /// Reports whether `coord` could join the network right now, ignoring cost.
    #[must_use]
    pub fn is_valid_placement(world: &World, coord: CellCoord) -> bool {
        super::network::is_valid_placement(coord, &world.network, &world.grid)
    }

    /// Snapshot of the mover, `None` until it has spawned.
    #[must_use]
    pub fn mover(world: &World) -> Option<MoverSnapshot> {
        world.mover.as_ref().map(|mover| mover.snapshot())
    }

    /// Number of ticks that advanced time.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
