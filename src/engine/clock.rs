use std::time::{Duration, Instant};

/// Monotonic time source queried once per rendered frame.
pub trait Clock {
    fn elapsed_ms(&self) -> f64;
}

/// Wall clock anchored at construction.
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrameClock {
    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Deterministic clock for headless runs: moves only when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: f64,
    step_ms: f64,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now_ms: 0.0,
            step_ms: step.as_secs_f64() * 1000.0,
        }
    }

    /// Move forward by one frame interval.
    pub fn tick(&mut self) {
        self.now_ms += self.step_ms;
    }

    #[cfg(test)]
    pub fn advance(&mut self, by: Duration) {
        self.now_ms += by.as_secs_f64() * 1000.0;
    }
}

impl Clock for ManualClock {
    fn elapsed_ms(&self) -> f64 {
        self.now_ms
    }
}
