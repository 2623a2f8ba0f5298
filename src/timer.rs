//! Cooperative countdown timer.
//!
//! A [`Timer`] is polled once per tick with [`Timer::update`]. It moves
//! `Idle -> Running -> Elapsed`, and back to `Running` when [`TimerMode::Looping`].
//! Each automatic transition raises an edge flag that stays up for exactly one
//! `update` call, so callers can run "on enter" logic without callbacks.

use std::time::Duration;

use crate::clock::{millis, Clock};

/// Current phase of a [`Timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No countdown active. The next `update` starts one.
    Idle,
    /// Counting toward the delay.
    Running,
    /// Delay reached.
    Elapsed,
}

/// What a timer does once it has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Stays `Elapsed` until the caller calls [`Timer::set`].
    OneShot,
    /// Restarts the countdown on the `update` following the elapse.
    Looping,
}

/// See module documentation.
#[derive(Debug, Clone)]
pub struct Timer {
    state: TimerState,
    mode: TimerMode,
    delay_ms: f64,
    entered_at: f64,
    just_transitioned: bool,
}

impl Timer {
    /// Create an idle timer.
    pub fn new(mode: TimerMode, delay: Duration) -> Self {
        Self::with_state(mode, delay, TimerState::Idle)
    }

    /// Create a timer already sitting in `state`, stamped at the clock's epoch.
    pub fn with_state(mode: TimerMode, delay: Duration, state: TimerState) -> Self {
        Self {
            state,
            mode,
            delay_ms: millis(delay),
            entered_at: 0.0,
            just_transitioned: false,
        }
    }

    /// Force the timer into `state` and stamp the current time.
    ///
    /// Used to start a countdown (`Running`), to re-arm (`Idle`), or to acknowledge an
    /// elapsed timer. Does not raise the edge flag.
    pub fn set(&mut self, state: TimerState, clock: &impl Clock) {
        self.enter(state, false, clock);
    }

    /// Advance the state machine against `clock`.
    pub fn update(&mut self, clock: &impl Clock) {
        let since_entered = clock.elapsed_millis() - self.entered_at;
        self.just_transitioned = false;

        match self.state {
            TimerState::Idle => self.enter(TimerState::Running, true, clock),
            TimerState::Elapsed => {
                if self.mode == TimerMode::Looping {
                    self.enter(TimerState::Running, true, clock);
                }
            }
            TimerState::Running => {
                if since_entered >= self.delay_ms {
                    self.enter(TimerState::Elapsed, true, clock);
                }
            }
        }
    }

    fn enter(&mut self, state: TimerState, edge: bool, clock: &impl Clock) {
        self.state = state;
        self.just_transitioned = edge;
        self.entered_at = clock.elapsed_millis();
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// True during the single `update` that followed an automatic transition.
    pub fn just_transitioned(&self) -> bool {
        self.just_transitioned
    }

    /// True while the timer sits in `Elapsed`, edge or not.
    pub fn is_elapsed(&self) -> bool {
        self.state == TimerState::Elapsed
    }

    /// True only on the update that moved the timer into `Elapsed`.
    pub fn just_elapsed(&self) -> bool {
        self.is_elapsed() && self.just_transitioned
    }
}

#[cfg(test)]
mod timer_tests {
    use super::*;
    use crate::clock::ManualClock;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn idle_timer_starts_on_first_update() {
        let clock = ManualClock::new();
        let mut timer = Timer::new(TimerMode::OneShot, DELAY);

        timer.update(&clock);
        assert_eq!(timer.state(), TimerState::Running);
        assert!(timer.just_transitioned());

        timer.update(&clock);
        assert_eq!(timer.state(), TimerState::Running);
        assert!(!timer.just_transitioned());
    }

    #[test]
    fn elapsed_edge_is_raised_exactly_once() {
        let clock = ManualClock::new();
        let mut timer = Timer::new(TimerMode::OneShot, DELAY);
        timer.set(TimerState::Running, &clock);

        clock.advance(Duration::from_millis(50));
        timer.update(&clock);
        assert_eq!(timer.state(), TimerState::Running);
        assert!(!timer.just_transitioned());

        clock.advance(Duration::from_millis(50));
        timer.update(&clock);
        assert_eq!(timer.state(), TimerState::Elapsed);
        assert!(timer.just_elapsed());

        for _ in 0..5 {
            clock.advance(DELAY);
            timer.update(&clock);
            assert_eq!(timer.state(), TimerState::Elapsed);
            assert!(!timer.just_transitioned());
        }

        timer.set(TimerState::Idle, &clock);
        timer.update(&clock);
        assert_eq!(timer.state(), TimerState::Running);
        assert!(timer.just_transitioned());
    }

    #[test]
    fn set_does_not_raise_the_edge() {
        let clock = ManualClock::new();
        let mut timer = Timer::new(TimerMode::OneShot, DELAY);
        timer.set(TimerState::Elapsed, &clock);
        assert!(timer.is_elapsed());
        assert!(!timer.just_transitioned());
    }

    #[test]
    fn looping_timer_restarts_after_elapsing() {
        let clock = ManualClock::new();
        let mut timer = Timer::new(TimerMode::Looping, DELAY);
        let mut elapses = 0;

        // idle -> running, then four full periods
        timer.update(&clock);
        for _ in 0..4 {
            clock.advance(DELAY);
            timer.update(&clock);
            if timer.just_elapsed() {
                elapses += 1;
                timer.update(&clock);
                assert_eq!(timer.state(), TimerState::Running);
                assert!(timer.just_transitioned());
            }
        }
        assert_eq!(elapses, 4);
    }

    #[test]
    fn countdown_measures_from_last_entry() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(10));
        let mut timer = Timer::new(TimerMode::OneShot, DELAY);
        timer.update(&clock);

        clock.advance(Duration::from_millis(99));
        timer.update(&clock);
        assert_eq!(timer.state(), TimerState::Running);

        clock.advance(Duration::from_millis(1));
        timer.update(&clock);
        assert!(timer.just_elapsed());
    }
}
