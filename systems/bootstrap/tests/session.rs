use std::{cell::RefCell, rc::Rc, time::Duration};

use glam::Vec2;
use rail_defence_core::{CellCoord, Command, Event, Phase, SpawnError};
use rail_defence_system_bootstrap::{GameConfig, Simulation};

const STEP: Duration = Duration::from_millis(50);

fn building_session() -> Simulation {
    let config = GameConfig::from_toml_str(
        r#"
        [phases]
        countdown_ms = 0
        "#,
    )
    .expect("valid config");
    let mut simulation = Simulation::new(&config);
    let _ = simulation.start();
    let _ = simulation.tick(STEP, Vec2::ZERO);
    assert_eq!(simulation.phase(), Phase::BuildPhase);
    simulation
}

fn lay_track(simulation: &mut Simulation, cells: &[(u32, u32)]) {
    for &(column, row) in cells {
        let events = simulation.click(CellCoord::new(column, row));
        assert!(
            events.contains(&Event::CellOccupied {
                cell: CellCoord::new(column, row)
            }),
            "expected ({column}, {row}) to be placed, got {events:?}"
        );
    }
}

#[test]
fn subscribers_follow_balance_through_build_and_refund() {
    let mut simulation = building_session();
    let balances = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&balances);
    let _ = simulation.subscribe(move |event| {
        if let Event::ResourcesChanged { balance } = event {
            sink.borrow_mut().push(*balance);
        }
    });

    lay_track(&mut simulation, &[(0, 0), (1, 0)]);
    let _ = simulation.click(CellCoord::new(1, 0));

    assert_eq!(*balances.borrow(), vec![9, 8, 9]);
    assert_eq!(simulation.balance(), 9);
    assert_eq!(simulation.network(), &[CellCoord::new(0, 0)]);
}

#[test]
fn unsubscribed_callback_stops_receiving() {
    let mut simulation = building_session();
    let seen = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&seen);
    let id = simulation.subscribe(move |_| *counter.borrow_mut() += 1);

    lay_track(&mut simulation, &[(0, 0)]);
    let after_first = *seen.borrow();
    assert!(after_first > 0);

    assert!(simulation.unsubscribe(id));
    lay_track(&mut simulation, &[(0, 1)]);
    assert_eq!(*seen.borrow(), after_first);
    assert!(!simulation.unsubscribe(id));
}

#[test]
fn begin_action_requires_connected_track() {
    let mut simulation = building_session();
    lay_track(&mut simulation, &[(0, 0), (1, 0), (2, 0)]);
    let _ = simulation.click(CellCoord::new(1, 0));

    let events = simulation.begin_action_phase();
    assert!(events.is_empty(), "split track must not start the action phase");
    assert_eq!(simulation.phase(), Phase::BuildPhase);

    lay_track(&mut simulation, &[(1, 0)]);
    let events = simulation.begin_action_phase();

    assert!(events.contains(&Event::ActionPhaseStarted));
    assert!(events.contains(&Event::MoverSpawned {
        cell: CellCoord::new(0, 0)
    }));
    assert_eq!(simulation.phase(), Phase::ActionPhase);
    assert_eq!(simulation.mover_position(), Some(Vec2::new(0.5, 0.5)));
}

#[test]
fn empty_track_enters_action_without_mover() {
    let mut simulation = building_session();

    let events = simulation.begin_action_phase();

    assert!(events.contains(&Event::MoverUnavailable {
        reason: SpawnError::NoStartCell
    }));
    assert!(simulation.mover().is_none());
    let events = simulation.tick(STEP, Vec2::new(1.0, 0.0));
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::TimeAdvanced { .. })));
}

#[test]
fn steering_input_drives_mover_along_track() {
    let mut simulation = building_session();
    lay_track(&mut simulation, &[(0, 0), (1, 0), (1, 1)]);
    let _ = simulation.begin_action_phase();

    let events = simulation.tick(STEP, Vec2::new(1.0, 0.0));
    assert!(events.contains(&Event::MoverDeparted {
        from: CellCoord::new(0, 0),
        to: CellCoord::new(1, 0),
    }));

    let mut arrivals = Vec::new();
    for _ in 0..40 {
        let events = simulation.tick(STEP, Vec2::new(0.0, 1.0));
        arrivals.extend(events.into_iter().filter_map(|event| match event {
            Event::MoverArrived { cell } => Some(cell),
            _ => None,
        }));
    }

    assert_eq!(arrivals, vec![CellCoord::new(1, 0), CellCoord::new(1, 1)]);
    assert_eq!(simulation.mover_position(), Some(Vec2::new(1.5, 1.5)));
}

#[test]
fn pause_freezes_session_until_resume() {
    let mut simulation = building_session();
    lay_track(&mut simulation, &[(0, 0), (1, 0)]);
    let _ = simulation.begin_action_phase();
    let _ = simulation.tick(STEP, Vec2::new(1.0, 0.0));
    let _ = simulation.tick(STEP, Vec2::ZERO);
    let before = simulation.mover_position();

    let events = simulation.request(Command::SetPhase {
        phase: Phase::Paused,
    });
    assert!(events.contains(&Event::GamePaused));

    for _ in 0..5 {
        assert!(simulation.tick(STEP, Vec2::new(-1.0, 0.0)).is_empty());
    }
    assert_eq!(simulation.mover_position(), before);

    let events = simulation.request(Command::Resume);
    assert_eq!(
        events,
        vec![
            Event::GameResumed,
            Event::PhaseChanged {
                phase: Phase::ActionPhase
            },
        ]
    );

    let _ = simulation.tick(STEP, Vec2::ZERO);
    assert_ne!(simulation.mover_position(), before, "mover continues after resume");
}

#[test]
fn main_menu_resets_the_session() {
    let mut simulation = building_session();
    lay_track(&mut simulation, &[(0, 0), (0, 1)]);
    let _ = simulation.begin_action_phase();

    let events = simulation.request(Command::SetPhase {
        phase: Phase::MainMenu,
    });

    assert!(events.contains(&Event::MainMenuEntered));
    assert!(events.contains(&Event::ResourcesChanged { balance: 10 }));
    assert!(simulation.network().is_empty());
    assert!(simulation.mover().is_none());
    assert!(!simulation
        .cell(CellCoord::new(0, 0))
        .expect("cell in bounds")
        .occupied);
}
