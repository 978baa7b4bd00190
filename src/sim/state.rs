//! Lifecycle status and the simulation clock

use serde::{Deserialize, Serialize};

/// Lifecycle of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Objects are stepped every tick
    #[default]
    Running,
    /// Frozen in place; resumes where it left off
    Paused,
    /// Frozen; the next start resets every object
    Stopped,
}

/// A requested lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Start,
    Pause,
    Stop,
}

/// Simulated time. Only advances while running.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GameClock {
    elapsed: f64,
    /// Auto-pause after this many seconds (0 disables)
    countdown: f32,
}

impl GameClock {
    pub fn new(countdown: f32) -> Self {
        Self {
            elapsed: 0.0,
            countdown: countdown.max(0.0),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += f64::from(dt);
    }

    /// Seconds of simulated time since the last restart
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn set_countdown(&mut self, seconds: f32) {
        self.countdown = seconds.max(0.0);
    }

    /// Seconds left on the countdown, zero when none is set or it ran out
    pub fn remaining(&self) -> f64 {
        if self.countdown <= 0.0 {
            return 0.0;
        }
        (f64::from(self.countdown) - self.elapsed).max(0.0)
    }

    pub fn countdown_elapsed(&self) -> bool {
        self.countdown > 0.0 && self.elapsed >= f64::from(self.countdown)
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_reaches_zero() {
        let mut clock = GameClock::new(1.0);
        assert!(!clock.countdown_elapsed());
        for _ in 0..4 {
            clock.advance(0.25);
        }
        assert!(clock.countdown_elapsed());
        assert_eq!(clock.remaining(), 0.0);
    }

    #[test]
    fn test_no_countdown_never_elapses() {
        let mut clock = GameClock::new(0.0);
        clock.advance(1000.0);
        assert!(!clock.countdown_elapsed());
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(GameClock::new(-3.0).countdown(), 0.0);
    }

    #[test]
    fn test_restart_keeps_countdown() {
        let mut clock = GameClock::new(5.0);
        clock.advance(2.0);
        assert_eq!(clock.remaining(), 3.0);
        clock.restart();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.remaining(), 5.0);
    }
}
