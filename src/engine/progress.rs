use super::{cooking_rate, MIN_RATE};
use crate::model::ProgressColor;

/// Accumulated float error tolerated when deciding that progress reached 1.0.
const COMPLETION_EPSILON: f64 = 1e-9;

/// Outcome of one [`ProgressTracker::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Nothing moved: not cooking, paused, or already done.
    Idle,
    Progressed,
    /// Progress crossed 1.0 on this call. Returned at most once per session.
    Completed,
}

/// Owns cooking completion for one session.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    base_step: f64,
    progress: f64,
    saved_progress: f64,
    rate: f64,
    cooking: bool,
    paused: bool,
    completed: bool,
}

impl ProgressTracker {
    pub fn new(base_step: f64) -> Self {
        Self {
            base_step,
            progress: 0.0,
            saved_progress: 0.0,
            rate: MIN_RATE,
            cooking: false,
            paused: false,
            completed: false,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[cfg(test)]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn color(&self) -> ProgressColor {
        ProgressColor::for_progress(self.progress)
    }

    /// Begin a fresh run from zero at the slowest rate.
    pub fn start(&mut self) {
        self.progress = 0.0;
        self.saved_progress = 0.0;
        self.rate = MIN_RATE;
        self.cooking = true;
        self.paused = false;
        self.completed = false;
    }

    pub fn set_intensity(&mut self, intensity: f64) {
        self.rate = cooking_rate(intensity);
    }

    pub fn advance(&mut self) -> Advance {
        if !self.cooking || self.paused || self.completed || self.progress >= 1.0 {
            return Advance::Idle;
        }
        self.progress += self.base_step * self.rate;
        if self.progress >= 1.0 - COMPLETION_EPSILON {
            self.progress = 1.0;
            self.completed = true;
            self.cooking = false;
            return Advance::Completed;
        }
        Advance::Progressed
    }

    pub fn pause(&mut self) {
        self.saved_progress = self.progress;
        self.paused = true;
    }

    /// Restore the progress captured by the last pause. Without a prior
    /// pause the saved value is 0.
    pub fn resume(&mut self) {
        self.paused = false;
        self.progress = self.saved_progress;
    }

    /// Always legal, whatever the tracker was doing.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.saved_progress = 0.0;
        self.rate = MIN_RATE;
        self.cooking = false;
        self.paused = false;
        self.completed = false;
    }
}
