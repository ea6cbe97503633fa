use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState { Stopped, Running, Paused }

/// Countdown driven by the caller's tick. Times are milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct GameClock {
    state: ClockState,
    remaining_ms: f64,
    elapsed_ms: f64,
}

impl GameClock {
    pub fn new(limit_ms: f64) -> Self { Self { state: ClockState::Stopped, remaining_ms: limit_ms, elapsed_ms: 0.0 } }

    pub fn state(&self) -> ClockState { self.state }
    pub fn remaining_ms(&self) -> f64 { self.remaining_ms }
    /// Running time accumulated since the last `set_time`.
    pub fn elapsed_ms(&self) -> f64 { self.elapsed_ms }
    pub fn is_running(&self) -> bool { self.state == ClockState::Running }

    pub fn start(&mut self) {
        if self.remaining_ms <= 0.0 || self.state == ClockState::Running { return; }
        self.state = ClockState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Running { self.state = ClockState::Paused; }
    }

    pub fn resume(&mut self) {
        if self.state == ClockState::Paused && self.remaining_ms > 0.0 { self.state = ClockState::Running; }
    }

    pub fn stop(&mut self) { self.state = ClockState::Stopped; }

    pub fn set_time(&mut self, ms: f64) {
        self.state = ClockState::Stopped;
        self.remaining_ms = ms;
        self.elapsed_ms = 0.0;
    }

    /// Advances a running clock. Returns true, after calling `on_time_up`,
    /// only on the tick that reaches zero.
    pub fn update<F: FnOnce()>(&mut self, delta_seconds: f64, on_time_up: F) -> bool {
        if self.state != ClockState::Running { return false; }
        let delta_ms = delta_seconds * 1000.0;
        self.elapsed_ms += delta_ms.min(self.remaining_ms);
        self.remaining_ms -= delta_ms;
        if self.remaining_ms > 0.0 { return false; }
        self.remaining_ms = 0.0;
        self.state = ClockState::Stopped;
        on_time_up();
        true
    }
}
