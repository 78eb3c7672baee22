use rail_defence_core::{CellCoord, Command, Event, Phase};
use rail_defence_system_builder::{Builder, BuilderInput};

fn build_phase_started() -> [Event; 2] {
    [
        Event::BuildPhaseStarted,
        Event::PhaseChanged {
            phase: Phase::BuildPhase,
        },
    ]
}

#[test]
fn click_emits_occupy_command_in_build_phase() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &build_phase_started(),
        BuilderInput {
            clicked_cell: Some(CellCoord::new(2, 0)),
            ..BuilderInput::default()
        },
        || true,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::OccupyCell {
            cell: CellCoord::new(2, 0),
        }],
        "builder should forward clicks as occupy requests",
    );
}

#[test]
fn click_ignored_outside_build_phase() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[Event::PhaseChanged {
            phase: Phase::ActionPhase,
        }],
        BuilderInput::new(Some(CellCoord::new(0, 0)), false),
        || true,
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "system must not emit placement commands outside the build phase",
    );
}

#[test]
fn phase_persists_between_frames() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &build_phase_started(),
        BuilderInput::default(),
        || true,
        &mut commands,
    );
    builder.handle(
        &[],
        BuilderInput::new(Some(CellCoord::new(0, 0)), false),
        || true,
        &mut commands,
    );

    assert_eq!(builder.phase(), Phase::BuildPhase);
    assert_eq!(commands.len(), 1);
}

#[test]
fn begin_action_requests_transition_when_connected() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &build_phase_started(),
        BuilderInput::new(None, true),
        || true,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SetPhase {
            phase: Phase::ActionPhase,
        }]
    );
}

#[test]
fn begin_action_suppressed_when_disconnected() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let mut checked = false;

    builder.handle(
        &build_phase_started(),
        BuilderInput::new(None, true),
        || {
            checked = true;
            false
        },
        &mut commands,
    );

    assert!(checked, "connectivity must be consulted before the transition");
    assert!(commands.is_empty(), "disconnected track must not start the action phase");
}

#[test]
fn connectivity_not_consulted_without_trigger() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &build_phase_started(),
        BuilderInput::default(),
        || panic!("connectivity check without trigger"),
        &mut commands,
    );

    assert!(commands.is_empty());
}
