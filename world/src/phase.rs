//! Top-level phase state machine.

use rail_defence_core::{Event, Phase, TransitionError};
use tracing::info;

/// Outcome of an accepted transition request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    /// The requested phase was already active; nothing was broadcast.
    Unchanged,
    /// The phase changed and entry notifications were broadcast.
    Entered(Phase),
}

/// Tracks the active phase and the phase recorded when pausing.
#[derive(Clone, Debug)]
pub(crate) struct PhaseController {
    current: Phase,
    before_pause: Option<Phase>,
}

impl Default for PhaseController {
    fn default() -> Self {
        Self {
            current: Phase::MainMenu,
            before_pause: None,
        }
    }
}

impl PhaseController {
    pub(crate) const fn current(&self) -> Phase {
        self.current
    }

    /// Time-dependent work runs in every phase except `Paused`.
    pub(crate) const fn time_flows(&self) -> bool {
        !matches!(self.current, Phase::Paused)
    }

    /// Requests a transition into `to`.
    ///
    /// `is_connected` is consulted only for `BuildPhase -> ActionPhase`.
    /// Leaving `Paused` for anything but `MainMenu` must go through
    /// [`PhaseController::resume`].
    pub(crate) fn transition<F>(
        &mut self,
        to: Phase,
        is_connected: F,
        out_events: &mut Vec<Event>,
    ) -> Result<Transition, TransitionError>
    where
        F: FnOnce() -> bool,
    {
        let from = self.current;
        if from == to {
            return Ok(Transition::Unchanged);
        }

        if !is_allowed(from, to) {
            return Err(TransitionError::Illegal { from, to });
        }

        if from == Phase::BuildPhase && to == Phase::ActionPhase && !is_connected() {
            return Err(TransitionError::NetworkDisconnected);
        }

        if to == Phase::Paused {
            self.before_pause = Some(from);
        } else {
            self.before_pause = None;
        }

        self.enter(to, entry_event(to), out_events);
        Ok(Transition::Entered(to))
    }

    /// Restores the phase recorded when `Paused` was entered.
    pub(crate) fn resume(&mut self, out_events: &mut Vec<Event>) -> Result<Phase, TransitionError> {
        let restored = match (self.current, self.before_pause) {
            (Phase::Paused, Some(phase)) => phase,
            (current, _) => return Err(TransitionError::NotPaused { current }),
        };

        self.before_pause = None;
        self.enter(restored, Event::GameResumed, out_events);
        Ok(restored)
    }

    fn enter(&mut self, phase: Phase, specific: Event, out_events: &mut Vec<Event>) {
        self.current = phase;
        out_events.push(specific);
        out_events.push(Event::PhaseChanged { phase });
        info!(?phase, "new game phase");
    }
}

fn is_allowed(from: Phase, to: Phase) -> bool {
    use Phase::{ActionPhase, BuildPhase, GameOver, MainMenu, Paused, Starting, Victory};

    match (from, to) {
        (_, MainMenu) => true,
        (MainMenu, Starting) => true,
        (Starting, BuildPhase) => true,
        (BuildPhase, ActionPhase | Paused | GameOver | Victory) => true,
        (ActionPhase, BuildPhase | Paused | GameOver | Victory) => true,
        _ => false,
    }
}

fn entry_event(phase: Phase) -> Event {
    match phase {
        Phase::MainMenu => Event::MainMenuEntered,
        Phase::Starting => Event::GameStarted,
        Phase::BuildPhase => Event::BuildPhaseStarted,
        Phase::ActionPhase => Event::ActionPhaseStarted,
        Phase::Paused => Event::GamePaused,
        Phase::GameOver => Event::GameOver,
        Phase::Victory => Event::Victory,
    }
}
