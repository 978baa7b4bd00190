//! Player reaction tracking
//!
//! Times the gap between a prompt and the player's answer on the simulated
//! clock, then maps the running average (or a score) onto a difficulty
//! level from 0 (slowest) to 9 (fastest).

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_REACTION_SECS, REACTION_LEVELS, SCORE_LEVELS};

/// Reaction-time and score based level picker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionTimer {
    /// Clock reading when the pending prompt started
    started_at: Option<f64>,
    samples: Vec<f64>,
    highest_score: Option<f32>,
}

impl ReactionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin timing a prompt shown at clock time `now`
    pub fn start(&mut self, now: f64) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_timing(&self) -> bool {
        self.started_at.is_some()
    }

    /// Forget recorded samples (the highest score is kept)
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Record an answer at clock time `now` and stop timing.
    ///
    /// Returns the reaction time when it was kept. With no prompt pending
    /// this starts one at `now` instead.
    pub fn record(&mut self, now: f64) -> Option<f64> {
        let Some(started_at) = self.started_at.take() else {
            self.start(now);
            return None;
        };
        let delta = now - started_at;
        if delta < MIN_REACTION_SECS {
            log::debug!("Dropped {:.3}s reaction", delta);
            return None;
        }
        self.samples.push(delta);
        Some(delta)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mean recorded reaction time, zero before the first sample
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Level for the average reaction time; `None` before the first sample
    pub fn level_by_time(&self) -> Option<usize> {
        let average = self.average();
        if average <= 0.0 {
            return None;
        }
        let level = REACTION_LEVELS
            .iter()
            .position(|&threshold| average >= threshold)
            .unwrap_or(REACTION_LEVELS.len());
        Some(level)
    }

    pub fn highest_score(&self) -> Option<f32> {
        self.highest_score
    }

    /// Set the score the score bands are cut from (non-positive is ignored)
    pub fn set_highest_score(&mut self, score: f32) {
        if !(score.is_finite() && score > 0.0) {
            log::debug!("Ignoring highest score {}", score);
            return;
        }
        self.highest_score = Some(score);
    }

    /// Band of `score` below the highest score; `None` until one is set
    pub fn level_by_score(&self, score: f32) -> Option<usize> {
        let highest = self.highest_score?;
        let band = highest / SCORE_LEVELS as f32;
        let level = (1..SCORE_LEVELS)
            .position(|i| score <= band * i as f32)
            .unwrap_or(SCORE_LEVELS - 1);
        Some(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameClock;

    /// Prompt, wait `secs` of simulated time, answer
    fn react(timer: &mut ReactionTimer, clock: &mut GameClock, secs: f32) -> Option<f64> {
        timer.start(clock.elapsed());
        clock.advance(secs);
        timer.record(clock.elapsed())
    }

    #[test]
    fn test_no_samples_no_level() {
        let timer = ReactionTimer::new();
        assert_eq!(timer.average(), 0.0);
        assert_eq!(timer.level_by_time(), None);
    }

    #[test]
    fn test_levels_follow_average_time() {
        let mut timer = ReactionTimer::new();
        let mut clock = GameClock::new(0.0);

        react(&mut timer, &mut clock, 7.0);
        assert_eq!(timer.level_by_time(), Some(0));

        react(&mut timer, &mut clock, 1.0);
        assert!((timer.average() - 4.0).abs() < 1.0e-6);
        assert_eq!(timer.level_by_time(), Some(2));

        timer.reset();
        react(&mut timer, &mut clock, 0.5);
        assert_eq!(timer.level_by_time(), Some(6));
        timer.reset();
        react(&mut timer, &mut clock, 0.15);
        assert_eq!(timer.level_by_time(), Some(9));
    }

    #[test]
    fn test_accidental_answers_are_dropped() {
        let mut timer = ReactionTimer::new();
        let mut clock = GameClock::new(0.0);

        assert_eq!(react(&mut timer, &mut clock, 0.05), None);
        assert!(timer.samples().is_empty());
        // Timing stopped with the answer
        assert!(!timer.is_timing());
    }

    #[test]
    fn test_answer_without_prompt_starts_timing() {
        let mut timer = ReactionTimer::new();
        assert_eq!(timer.record(3.0), None);
        assert!(timer.is_timing());
        assert_eq!(timer.record(4.5), Some(1.5));

        timer.start(10.0);
        timer.stop();
        assert_eq!(timer.record(20.0), None);
        assert_eq!(timer.samples(), &[1.5]);
    }

    #[test]
    fn test_score_bands() {
        let mut timer = ReactionTimer::new();
        assert_eq!(timer.level_by_score(50.0), None);

        timer.set_highest_score(0.0);
        assert_eq!(timer.highest_score(), None);

        timer.set_highest_score(100.0);
        assert_eq!(timer.level_by_score(0.0), Some(0));
        assert_eq!(timer.level_by_score(10.0), Some(0));
        assert_eq!(timer.level_by_score(10.5), Some(1));
        assert_eq!(timer.level_by_score(85.0), Some(8));
        assert_eq!(timer.level_by_score(95.0), Some(9));
        assert_eq!(timer.level_by_score(250.0), Some(9));

        // Reset keeps the bands
        timer.reset();
        assert_eq!(timer.highest_score(), Some(100.0));
    }
}
