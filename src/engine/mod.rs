//! Cooking core: the progress tracker, the fire control and the effect
//! coordinator that keeps fire, steam, soup and audio in step with a session.

mod clock;
mod effects;
mod intensity;
mod progress;
mod scene;

pub use clock::{Clock, FrameClock, ManualClock};
pub use effects::{EffectCoordinator, FireFade};
pub use intensity::IntensityControl;
pub use progress::{Advance, ProgressTracker};
pub use scene::{EffectSink, SceneState};

/// Slowest cooking rate, reached with the fire at zero.
pub const MIN_RATE: f64 = 0.5;
/// Extra rate gained between zero and full fire.
pub const RATE_SPAN: f64 = 1.5;

/// Soup boil frequency per unit of fire intensity.
pub const BOIL_FREQUENCY_SCALE: f64 = 10.0;

/// Cooking rate multiplier for a fire intensity. Out-of-range input is clamped,
/// so the rate always lies in [MIN_RATE, MIN_RATE + RATE_SPAN].
pub fn cooking_rate(intensity: f64) -> f64 {
    MIN_RATE + RATE_SPAN * clamp_unit(intensity)
}

/// Clamp operator input to [0, 1]; NaN counts as zero.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
pub(crate) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
