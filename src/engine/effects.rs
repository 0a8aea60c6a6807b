use std::time::Duration;

use super::{Advance, EffectSink, IntensityControl, ProgressTracker, BOIL_FREQUENCY_SCALE};
use crate::model::{CookingConfig, ProgressColor, SessionState};

/// Post-completion fire fade, driven by frame deltas rather than a timer.
///
/// Each full `period` of accumulated frame time removes `step` opacity until
/// the fire reaches zero. At most one fade is in flight.
#[derive(Debug, Clone)]
pub struct FireFade {
    step: f64,
    period_ms: f64,
    accumulated_ms: f64,
    active: bool,
}

impl FireFade {
    pub fn new(step: f64, period: Duration) -> Self {
        Self {
            step,
            period_ms: period.as_secs_f64() * 1000.0,
            accumulated_ms: 0.0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns false when a fade is already running.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.accumulated_ms = 0.0;
        true
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.accumulated_ms = 0.0;
    }

    /// Consume `delta_ms` of frame time. Returns the new opacity when it changed.
    pub fn tick(&mut self, delta_ms: f64, opacity: f64) -> Option<f64> {
        if !self.active {
            return None;
        }
        self.accumulated_ms += delta_ms.max(0.0);
        let mut next = opacity;
        while self.accumulated_ms >= self.period_ms && next > 0.0 {
            self.accumulated_ms -= self.period_ms;
            next = (next - self.step).max(0.0);
        }
        if next <= 0.0 {
            self.cancel();
        }
        (next != opacity).then_some(next)
    }
}

/// Maps operator intensity and session transitions onto fire, steam, soup
/// and audio, and drives the progress tracker on each transition.
///
/// | state   | fire opacity | frequency  | steam opacity | volume    |
/// |---------|--------------|------------|---------------|-----------|
/// | Idle    | 0            | 0          | 0             | 0         |
/// | Cooking | 1            | intensity  | 1             | intensity |
/// | Paused  | 0            | 0          | 0             | 0         |
/// | Cooked  | fading to 0  | residual   | residual      | residual  |
pub struct EffectCoordinator<S: EffectSink> {
    sink: S,
    tracker: ProgressTracker,
    control: IntensityControl,
    fade: FireFade,
    fire_opacity: f64,
    residual: f64,
}

impl<S: EffectSink> EffectCoordinator<S> {
    pub fn new(cfg: &CookingConfig, sink: S) -> Self {
        let mut coordinator = Self {
            sink,
            tracker: ProgressTracker::new(cfg.base_step),
            control: IntensityControl::new(),
            fade: FireFade::new(cfg.fade_step, cfg.fade_period),
            fire_opacity: 0.0,
            residual: cfg.residual_simmer,
        };
        coordinator.apply_idle_row();
        coordinator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn control(&self) -> &IntensityControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut IntensityControl {
        &mut self.control
    }

    pub fn fade_active(&self) -> bool {
        self.fade.is_active()
    }

    pub fn on_start(&mut self) {
        self.control.enable();
        self.set_fire_opacity(1.0);
        self.sink.set_steam_opacity(1.0);
        self.apply_frequencies(0.0);
        self.tracker.start();
    }

    pub fn on_stop(&mut self) {
        self.set_fire_opacity(0.0);
        self.sink.set_steam_opacity(0.0);
        self.apply_frequencies(0.0);
        self.control.disable();
        self.tracker.pause();
    }

    pub fn on_resume(&mut self) {
        self.set_fire_opacity(1.0);
        let intensity = self.control.enable_with_staged();
        self.sink.set_steam_opacity(1.0);
        self.apply_frequencies(intensity);
        self.tracker.resume();
        self.tracker.set_intensity(intensity);
    }

    /// Legal from any state: cancels the fade and reapplies the Idle row.
    pub fn on_reset(&mut self) {
        self.fade.cancel();
        self.apply_idle_row();
        self.tracker.reset();
        self.sink.set_progress(0.0, ProgressColor::Nominal);
        self.sink.set_cooked_visible(false);
    }

    /// Returns false if a fade was already in flight, in which case nothing
    /// is reapplied.
    pub fn on_complete(&mut self) -> bool {
        if !self.fade.start() {
            return false;
        }
        self.control.disable();
        let residual = self.residual;
        self.sink.set_steam_frequency(residual);
        self.sink.set_steam_opacity(residual);
        self.sink.set_volume(residual);
        self.set_boil(residual);
        true
    }

    /// Operator intensity only reaches the effects and the cooking rate while
    /// cooking. Returns whether it was applied.
    pub fn on_intensity_changed(&mut self, value: f64, state: SessionState) -> bool {
        if state != SessionState::Cooking {
            return false;
        }
        self.apply_frequencies(value);
        self.tracker.set_intensity(value);
        true
    }

    pub fn advance(&mut self) -> Advance {
        self.tracker.advance()
    }

    /// Tick the fire fade. Returns true on the frame the fire goes out.
    pub fn tick_fade(&mut self, delta_ms: f64) -> bool {
        let was_active = self.fade.is_active();
        if let Some(opacity) = self.fade.tick(delta_ms, self.fire_opacity) {
            self.set_fire_opacity(opacity);
        }
        was_active && !self.fade.is_active()
    }

    /// Push per-frame values after progress has been settled for the frame.
    pub fn push_frame(&mut self, time_s: f64, cooked: bool) {
        self.sink.set_time(time_s);
        self.sink
            .set_progress(self.tracker.progress(), self.tracker.color());
        self.sink.set_cooked_visible(cooked);
    }

    fn apply_idle_row(&mut self) {
        self.control.force_zero_and_disable();
        self.set_fire_opacity(0.0);
        self.sink.set_steam_opacity(0.0);
        self.apply_frequencies(0.0);
    }

    fn apply_frequencies(&mut self, intensity: f64) {
        self.sink.set_fire_frequency(intensity);
        self.sink.set_steam_frequency(intensity);
        self.sink.set_volume(intensity);
        self.set_boil(intensity);
    }

    fn set_boil(&mut self, level: f64) {
        let frequency = level * BOIL_FREQUENCY_SCALE;
        self.sink.set_soup_boil(frequency, frequency / 2.0);
    }

    fn set_fire_opacity(&mut self, opacity: f64) {
        self.fire_opacity = opacity;
        self.sink.set_fire_opacity(opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{approx, SceneState};

    fn coordinator() -> EffectCoordinator<SceneState> {
        EffectCoordinator::new(&CookingConfig::default(), SceneState::default())
    }

    #[test]
    fn fade_steps_once_per_period() {
        let mut fade = FireFade::new(0.05, Duration::from_millis(50));
        assert!(fade.start());
        assert_eq!(fade.tick(30.0, 1.0), None);
        let op = fade.tick(30.0, 1.0).expect("one period elapsed");
        assert!(approx(op, 0.95));
        let op = fade.tick(100.0, op).expect("two periods elapsed");
        assert!(approx(op, 0.85));
    }

    #[test]
    fn fade_stops_at_zero() {
        let mut fade = FireFade::new(0.3, Duration::from_millis(10));
        fade.start();
        let op = fade.tick(1_000.0, 1.0).expect("faded");
        assert_eq!(op, 0.0);
        assert!(!fade.is_active());
        assert_eq!(fade.tick(1_000.0, 0.0), None);
    }

    #[test]
    fn only_one_fade_in_flight() {
        let mut fade = FireFade::new(0.05, Duration::from_millis(50));
        assert!(fade.start());
        assert!(!fade.start());
        fade.cancel();
        assert!(fade.start());
    }

    #[test]
    fn new_coordinator_applies_idle_row() {
        let c = coordinator();
        let s = c.sink();
        assert_eq!(s.fire_opacity, 0.0);
        assert_eq!(s.steam_opacity, 0.0);
        assert_eq!(s.volume, 0.0);
        assert!(!c.control().enabled());
    }

    #[test]
    fn start_shows_fire_at_zero_frequency() {
        let mut c = coordinator();
        c.on_start();
        let s = c.sink();
        assert_eq!(s.fire_opacity, 1.0);
        assert_eq!(s.steam_opacity, 1.0);
        assert_eq!(s.fire_frequency, 0.0);
        assert_eq!(s.steam_frequency, 0.0);
        assert!(c.control().enabled());
        assert!(approx(c.tracker().rate(), 0.5));
    }

    #[test]
    fn intensity_applies_only_while_cooking() {
        let mut c = coordinator();
        c.on_start();
        assert!(!c.on_intensity_changed(0.8, SessionState::Paused));
        assert_eq!(c.sink().fire_frequency, 0.0);
        assert!(c.on_intensity_changed(0.8, SessionState::Cooking));
        let s = c.sink();
        assert_eq!(s.fire_frequency, 0.8);
        assert_eq!(s.steam_frequency, 0.8);
        assert_eq!(s.volume, 0.8);
        assert!(approx(s.boil_frequency, 8.0));
        assert!(approx(s.boil_speed, 4.0));
        assert!(approx(c.tracker().rate(), 0.5 + 1.5 * 0.8));
    }

    #[test]
    fn stop_blanks_everything_and_resume_restores_intensity() {
        let mut c = coordinator();
        c.on_start();
        c.control_mut().set(0.6);
        c.on_intensity_changed(0.6, SessionState::Cooking);
        c.on_stop();
        {
            let s = c.sink();
            assert_eq!(s.fire_opacity, 0.0);
            assert_eq!(s.steam_opacity, 0.0);
            assert_eq!(s.steam_frequency, 0.0);
            assert_eq!(s.volume, 0.0);
        }
        assert!(!c.control().enabled());
        assert!(c.tracker().is_paused());

        c.on_resume();
        let s = c.sink();
        assert_eq!(s.fire_opacity, 1.0);
        assert_eq!(s.steam_opacity, 1.0);
        assert_eq!(s.steam_frequency, 0.6);
        assert_eq!(s.volume, 0.6);
        assert!(c.control().enabled());
        assert!(!c.tracker().is_paused());
    }

    #[test]
    fn staged_intensity_lands_on_resume() {
        let mut c = coordinator();
        c.on_start();
        c.on_stop();
        assert_eq!(c.control_mut().set(0.9), None);
        c.on_resume();
        assert_eq!(c.sink().fire_frequency, 0.9);
        assert!(approx(c.tracker().rate(), 0.5 + 1.5 * 0.9));
    }

    #[test]
    fn complete_settles_on_residual_and_fades_fire() {
        let mut c = coordinator();
        c.on_start();
        assert!(c.on_complete());
        {
            let s = c.sink();
            assert_eq!(s.steam_frequency, 0.1);
            assert_eq!(s.steam_opacity, 0.1);
            assert_eq!(s.volume, 0.1);
        }
        assert!(!c.control().enabled());
        assert!(c.fade_active());
        assert!(!c.on_complete());

        assert!(!c.tick_fade(50.0));
        assert!(approx(c.sink().fire_opacity, 0.95));
        let mut finished = false;
        for _ in 0..40 {
            if c.tick_fade(50.0) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(c.sink().fire_opacity, 0.0);
        assert!(!c.fade_active());
    }

    #[test]
    fn reset_cancels_fade_and_zeroes_scene() {
        let mut c = coordinator();
        c.on_start();
        c.on_complete();
        c.tick_fade(120.0);
        c.on_reset();
        assert!(!c.fade_active());
        c.tick_fade(1_000.0);
        let s = c.sink();
        assert_eq!(s.fire_opacity, 0.0);
        assert_eq!(s.steam_opacity, 0.0);
        assert_eq!(s.volume, 0.0);
        assert_eq!(s.progress_scale, 0.0);
        assert!(!s.cooked_visible);
        assert_eq!(c.tracker().progress(), 0.0);
    }
}
