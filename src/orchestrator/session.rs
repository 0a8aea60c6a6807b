//! Session state machine.
//!
//! `Idle → Cooking → {Paused ⇄ Cooking} → Cooked`, with `reset` returning to
//! `Idle` from anywhere. The controller is the only writer of session state
//! and progress; calls from the wrong state are ignored, never raised.

use crate::engine::{Advance, EffectCoordinator, EffectSink, SceneState};
use crate::metrics;
use crate::model::{CookingConfig, FrameSnapshot, InfoEvent, SessionState, SessionSummary};
use rand::RngCore;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Receives session transitions. Registered once, when the controller is built.
pub trait SessionObserver {
    fn on_transition(&mut self, from: SessionState, to: SessionState);
    /// Delivered exactly once per session, after the Cooked effects are applied.
    fn on_completed(&mut self);
    fn on_info(&mut self, _info: &InfoEvent) {}
}

/// What happened to an operator intensity change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntensityChange {
    Applied(f64),
    /// Held until the session resumes.
    Staged(f64),
    Unchanged,
    Ignored,
}

const MAX_SAMPLES: usize = 10_000;

#[derive(Debug, Default)]
struct SessionStats {
    frames_total: u64,
    frames_cooking: u64,
    frames_paused: u64,
    pauses: u64,
    intensity_samples: VecDeque<f64>,
    frame_deltas_ms: VecDeque<f64>,
}

impl SessionStats {
    fn push_capped(samples: &mut VecDeque<f64>, v: f64) {
        if samples.len() == MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(v);
    }
}

fn to_vec(samples: &VecDeque<f64>) -> Vec<f64> {
    samples.iter().copied().collect()
}

pub struct SessionController<S: EffectSink> {
    cfg: CookingConfig,
    state: SessionState,
    start_latched: bool,
    effects: EffectCoordinator<S>,
    observers: Vec<Box<dyn SessionObserver + Send>>,
    last_now_ms: Option<f64>,
    frame: u64,
    session_id: String,
    started_utc: Option<String>,
    completed_utc: Option<String>,
    stats: SessionStats,
}

fn gen_session_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    format!("{:016x}", u64::from_le_bytes(b))
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

impl<S: EffectSink> SessionController<S> {
    pub fn new(cfg: CookingConfig, sink: S) -> Self {
        let effects = EffectCoordinator::new(&cfg, sink);
        Self {
            cfg,
            state: SessionState::Idle,
            start_latched: false,
            effects,
            observers: Vec::new(),
            last_now_ms: None,
            frame: 0,
            session_id: gen_session_id(),
            started_utc: None,
            completed_utc: None,
            stats: SessionStats::default(),
        }
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + Send + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.effects.tracker().progress()
    }

    pub fn rate(&self) -> f64 {
        self.effects.tracker().rate()
    }

    pub fn intensity(&self) -> f64 {
        self.effects.control().value()
    }

    pub fn effects(&self) -> &EffectCoordinator<S> {
        &self.effects
    }

    /// One-shot cook trigger: accepted once from Idle until the next reset.
    pub fn start(&mut self) -> bool {
        if self.state != SessionState::Idle || self.start_latched {
            return self.ignore("start");
        }
        self.start_latched = true;
        self.effects.on_start();
        self.started_utc = Some(now_rfc3339());
        self.transition(SessionState::Cooking);
        true
    }

    pub fn stop(&mut self) -> bool {
        if self.state != SessionState::Cooking {
            return self.ignore("stop");
        }
        self.effects.on_stop();
        self.stats.pauses += 1;
        self.transition(SessionState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return self.ignore("resume");
        }
        self.effects.on_resume();
        self.transition(SessionState::Cooking);
        true
    }

    /// Legal from every state, including mid-cook and mid-fade.
    pub fn reset(&mut self) -> bool {
        self.effects.on_reset();
        self.start_latched = false;
        self.session_id = gen_session_id();
        self.started_utc = None;
        self.completed_utc = None;
        self.stats = SessionStats::default();
        if self.state != SessionState::Idle {
            self.transition(SessionState::Idle);
        }
        true
    }

    /// Operator input from the fire slider.
    pub fn set_intensity(&mut self, value: f64) -> IntensityChange {
        let control = self.effects.control_mut();
        if !control.enabled() {
            if self.state != SessionState::Paused {
                self.ignore("fire change");
                return IntensityChange::Ignored;
            }
            control.set(value);
            let staged = control.staged().unwrap_or_default();
            self.notify_info(InfoEvent::IntensityStaged { value: staged });
            return IntensityChange::Staged(staged);
        }
        match control.set(value) {
            Some(v) => {
                self.effects.on_intensity_changed(v, self.state);
                debug!(intensity = v, rate = self.rate(), "fire intensity changed");
                IntensityChange::Applied(v)
            }
            None => IntensityChange::Unchanged,
        }
    }

    /// One rendered frame. Progress settles first, then the fade, then the
    /// per-frame values are pushed, so a frame never shows a half-applied state.
    pub fn update(&mut self, now_ms: f64) {
        let delta_ms = match self.last_now_ms {
            Some(last) if now_ms >= last => now_ms - last,
            _ => 0.0,
        };
        self.last_now_ms = Some(now_ms);
        self.frame += 1;
        self.stats.frames_total += 1;
        if self.stats.frames_total > 1 {
            SessionStats::push_capped(&mut self.stats.frame_deltas_ms, delta_ms);
        }

        match self.state {
            SessionState::Cooking => {
                self.stats.frames_cooking += 1;
                let intensity = self.intensity();
                SessionStats::push_capped(&mut self.stats.intensity_samples, intensity);
                if self.effects.advance() == Advance::Completed {
                    self.complete();
                }
            }
            SessionState::Paused => self.stats.frames_paused += 1,
            SessionState::Idle | SessionState::Cooked => {}
        }

        if self.effects.tick_fade(delta_ms) {
            debug!(frame = self.frame, "fire fade finished");
            self.notify_info(InfoEvent::FadeFinished);
        }

        let cooked = self.state == SessionState::Cooked;
        self.effects.push_frame(now_ms / 1000.0, cooked);
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            started_utc: self.started_utc.clone(),
            completed_utc: self.completed_utc.clone(),
            state: self.state,
            progress: self.progress(),
            frames_total: self.stats.frames_total,
            frames_cooking: self.stats.frames_cooking,
            frames_paused: self.stats.frames_paused,
            pauses: self.stats.pauses,
            intensity: metrics::intensity_summary(&to_vec(&self.stats.intensity_samples)),
            frame_pacing: metrics::frame_pacing_summary(&to_vec(&self.stats.frame_deltas_ms)),
            config: self.cfg.clone(),
        }
    }

    fn complete(&mut self) {
        // The tracker reports completion once per session, and only while cooking.
        let from = std::mem::replace(&mut self.state, SessionState::Cooked);
        if !self.effects.on_complete() {
            return;
        }
        self.completed_utc = Some(now_rfc3339());
        self.log_transition(from, SessionState::Cooked);
        info!(
            session = %self.session_id,
            frames = self.stats.frames_cooking,
            "soup is cooked"
        );
        self.notify_transition(from, SessionState::Cooked);
        for o in self.observers.iter_mut() {
            o.on_completed();
        }
    }

    fn transition(&mut self, to: SessionState) {
        let from = std::mem::replace(&mut self.state, to);
        self.log_transition(from, to);
        self.notify_transition(from, to);
    }

    fn log_transition(&self, from: SessionState, to: SessionState) {
        info!(
            from = from.label(),
            to = to.label(),
            progress = self.progress(),
            "session transition"
        );
    }

    fn notify_transition(&mut self, from: SessionState, to: SessionState) {
        for o in self.observers.iter_mut() {
            o.on_transition(from, to);
        }
    }

    fn ignore(&mut self, action: &str) -> bool {
        debug!(action, state = self.state.label(), "ignored out-of-order call");
        self.notify_info(InfoEvent::Ignored {
            action: action.to_string(),
            state: self.state,
        });
        false
    }

    fn notify_info(&mut self, info: InfoEvent) {
        for o in self.observers.iter_mut() {
            o.on_info(&info);
        }
    }
}

impl SessionController<SceneState> {
    pub fn snapshot(&self) -> FrameSnapshot {
        let control = self.effects.control();
        FrameSnapshot {
            frame: self.frame,
            state: self.state,
            progress: self.progress(),
            rate: self.rate(),
            intensity: control.value(),
            intensity_enabled: control.enabled(),
            fade_active: self.effects.fade_active(),
            scene: self.effects.sink().clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
