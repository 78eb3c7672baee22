//! Tick-driven deferred execution.

use std::time::Duration;

use rail_defence_core::Event;

/// Timer due at `deadline` on the queue's clock.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Timer<T> {
    deadline: Duration,
    sequence: u64,
    payload: T,
}

/// Queue of payloads released after a delay of simulated time.
///
/// The clock only advances on [`Event::TimeAdvanced`], so timers stand still
/// while the world withholds ticks (paused) and resume where they stopped.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_sequence: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_sequence: 0,
            timers: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to be released once `delay` of simulated time has passed.
    pub fn schedule(&mut self, delay: Duration, payload: T) {
        let timer = Timer {
            deadline: self.now.saturating_add(delay),
            sequence: self.next_sequence,
            payload,
        };
        self.next_sequence += 1;
        self.timers.push(timer);
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Reports whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advances the clock by every `TimeAdvanced` in `events` and returns the
    /// payloads that came due, ordered by deadline then scheduling order.
    pub fn advance(&mut self, events: &[Event]) -> Vec<T> {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.now = self.now.saturating_add(*dt);
            }
        }

        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .timers
            .drain(..)
            .partition(|timer| timer.deadline <= now);
        self.timers = pending;

        due.sort_by_key(|timer| (timer.deadline, timer.sequence));
        due.into_iter().map(|timer| timer.payload).collect()
    }
}
