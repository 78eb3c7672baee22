#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composition root that wires the world, its systems and event subscribers
//! into a playable Rail Defence session.

mod bus;
pub mod config;
mod timers;

use std::time::Duration;

use glam::Vec2;
use rail_defence_core::{CellCoord, CellSnapshot, Command, Event, MoverSnapshot, Phase};
use rail_defence_system_builder::{Builder, BuilderInput};
use rail_defence_system_movement::{self as movement, Movement};
use rail_defence_world::{self as world, query, World};
use tracing::{debug, info};

pub use bus::{EventBus, SubscriptionId};
pub use config::GameConfig;
pub use timers::TimerQueue;

/// Owns every moving part of a session and routes commands and events between them.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    builder: Builder,
    movement: Movement,
    bus: EventBus,
    timers: TimerQueue<Command>,
    countdown: Duration,
}

impl Simulation {
    /// Builds a world configured from `config`, sitting in the main menu.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        for command in [
            Command::ConfigureTileGrid {
                columns: config.grid.columns,
                rows: config.grid.rows,
                tile_length: config.grid.tile_length,
                blocked: config.grid.blocked_cells(),
            },
            Command::ConfigureLedger {
                balance: config.economy.starting_resources,
                cost_per_cell: config.economy.cost_per_cell,
            },
            Command::ConfigureMover {
                speed: config.mover.speed,
                arrival_epsilon: config.mover.arrival_epsilon,
            },
        ] {
            world::apply(&mut world, command, &mut events);
        }
        debug!(?events, "world configured");

        Self {
            world,
            builder: Builder::new(),
            movement: Movement::new(movement::Config::new(config.mover.input_threshold)),
            bus: EventBus::new(),
            timers: TimerQueue::new(),
            countdown: config.phases.countdown(),
        }
    }

    /// Leaves the main menu and schedules the build phase after the countdown.
    pub fn start(&mut self) -> Vec<Event> {
        let events = self.execute(vec![Command::SetPhase {
            phase: Phase::Starting,
        }]);
        if events.contains(&Event::GameStarted) {
            info!(countdown = ?self.countdown, "session starting");
            self.timers.schedule(
                self.countdown,
                Command::SetPhase {
                    phase: Phase::BuildPhase,
                },
            );
        }
        events
    }

    /// Forwards a click on `cell` through the builder system.
    pub fn click(&mut self, cell: CellCoord) -> Vec<Event> {
        let mut commands = Vec::new();
        let world = &self.world;
        self.builder.handle(
            &[],
            BuilderInput::new(Some(cell), false),
            || query::is_network_connected(world),
            &mut commands,
        );
        self.execute(commands)
    }

    /// Requests the action phase; nothing happens while the track is disconnected.
    pub fn begin_action_phase(&mut self) -> Vec<Event> {
        let mut commands = Vec::new();
        let world = &self.world;
        self.builder.handle(
            &[],
            BuilderInput::new(None, true),
            || query::is_network_connected(world),
            &mut commands,
        );
        self.execute(commands)
    }

    /// Applies `command` directly, e.g. pause, resume or a return to the menu.
    pub fn request(&mut self, command: Command) -> Vec<Event> {
        self.execute(vec![command])
    }

    /// Runs one authoritative tick followed by the movement system.
    ///
    /// Due timers fire within the same tick. `input` is the raw directional
    /// vector for this frame.
    pub fn tick(&mut self, dt: Duration, input: Vec2) -> Vec<Event> {
        let mut events = self.execute(vec![Command::Tick { dt }]);

        let mut commands = Vec::new();
        let mover = query::mover(&self.world);
        self.movement.handle(&[], mover.as_ref(), input, &mut commands);
        events.extend(self.execute(commands));
        events
    }

    /// Registers a callback invoked for every event the session produces.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.bus.subscribe(callback)
    }

    /// Removes a subscription; returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Banner shown when the session boots.
    #[must_use]
    pub fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Current resource balance.
    #[must_use]
    pub fn balance(&self) -> u32 {
        query::balance(&self.world)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Grid size as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        query::dimensions(&self.world)
    }

    /// State of a single cell, `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<CellSnapshot> {
        query::cell(&self.world, coord)
    }

    /// Every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> Vec<CellSnapshot> {
        query::cells(&self.world)
    }

    /// Occupied cells in insertion order.
    #[must_use]
    pub fn network(&self) -> &[CellCoord] {
        query::network(&self.world)
    }

    /// Mover snapshot, if one has been spawned this session.
    #[must_use]
    pub fn mover(&self) -> Option<MoverSnapshot> {
        query::mover(&self.world)
    }

    /// Mover position in world units.
    #[must_use]
    pub fn mover_position(&self) -> Option<Vec2> {
        self.mover().map(|mover| Vec2::from(mover.position))
    }

    fn execute(&mut self, mut commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        while !commands.is_empty() {
            let start = events.len();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            let batch = &events[start..];
            if batch.contains(&Event::MainMenuEntered) {
                self.timers.clear();
            }
            commands = self.timers.advance(batch);
        }

        self.observe(&events);
        self.bus.publish(&events);
        events
    }

    // Systems track the phase from events; passes without input emit nothing.
    fn observe(&mut self, events: &[Event]) {
        let mut ignored = Vec::new();
        self.builder
            .handle(events, BuilderInput::default(), || false, &mut ignored);
        self.movement.handle(events, None, Vec2::ZERO, &mut ignored);
        debug_assert!(ignored.is_empty());
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
