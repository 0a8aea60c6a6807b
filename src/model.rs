use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::SceneState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookingConfig {
    /// Progress gained per frame at rate 1.0.
    pub base_step: f64,
    /// Fire opacity removed per fade period after completion.
    pub fade_step: f64,
    #[serde(with = "humantime_serde")]
    pub fade_period: Duration,
    /// Steam, audio and boil level held once the soup is cooked.
    pub residual_simmer: f64,
    #[serde(with = "humantime_serde")]
    pub frame_interval: Duration,
    /// How far one key press moves the fire slider.
    pub intensity_step: f64,
}

impl Default for CookingConfig {
    fn default() -> Self {
        Self {
            base_step: 5e-4,
            fade_step: 0.05,
            fade_period: Duration::from_millis(50),
            residual_simmer: 0.1,
            frame_interval: Duration::from_millis(16),
            intensity_step: 0.05,
        }
    }
}

impl CookingConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.base_step.is_finite() && self.base_step > 0.0 && self.base_step <= 1.0) {
            anyhow::bail!("base_step must be in (0, 1], got {}", self.base_step);
        }
        if !(self.fade_step.is_finite() && self.fade_step > 0.0 && self.fade_step <= 1.0) {
            anyhow::bail!("fade_step must be in (0, 1], got {}", self.fade_step);
        }
        if !(0.0..=1.0).contains(&self.residual_simmer) {
            anyhow::bail!(
                "residual_simmer must be in [0, 1], got {}",
                self.residual_simmer
            );
        }
        if !(self.intensity_step > 0.0 && self.intensity_step <= 1.0) {
            anyhow::bail!(
                "intensity_step must be in (0, 1], got {}",
                self.intensity_step
            );
        }
        if self.fade_period.is_zero() {
            anyhow::bail!("fade_period must be non-zero");
        }
        if self.frame_interval.is_zero() {
            anyhow::bail!("frame_interval must be non-zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Cooking,
    Paused,
    Cooked,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Cooking => "Cooking",
            SessionState::Paused => "Paused",
            SessionState::Cooked => "Cooked",
        }
    }
}

/// Progress bar tint. Derived from progress alone, never from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressColor {
    Nominal,
    Warning,
}

/// Progress at which the bar switches to the warning tint.
pub const WARNING_THRESHOLD: f64 = 0.7;

impl ProgressColor {
    pub fn for_progress(progress: f64) -> Self {
        if (WARNING_THRESHOLD..1.0).contains(&progress) {
            ProgressColor::Warning
        } else {
            ProgressColor::Nominal
        }
    }
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub state: SessionState,
    pub progress: f64,
    pub rate: f64,
    pub intensity: f64,
    pub intensity_enabled: bool,
    pub fade_active: bool,
    pub scene: SceneState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    Completed,
    Frame {
        // Box to keep SessionEvent small; the snapshot carries the whole scene.
        snapshot: Box<FrameSnapshot>,
    },
    Info(InfoEvent),
}

/// Structured info events emitted by the controller and consumed by UI/CLI layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    Message(String),
    Ignored {
        action: String,
        state: SessionState,
    },
    IntensityStaged {
        value: f64,
    },
    FadeFinished,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::Ignored { action, state } => {
                format!("{} ignored while {}", action, state.label())
            }
            InfoEvent::IntensityStaged { value } => {
                format!("Fire control is off; {:.0}% staged for resume", value * 100.0)
            }
            InfoEvent::FadeFinished => "The fire has gone out".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensitySummary {
    pub samples: u64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePacingSummary {
    pub mean_ms: Option<f64>,
    pub median_ms: Option<f64>,
    pub p25_ms: Option<f64>,
    pub p75_ms: Option<f64>,
    pub max_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub started_utc: Option<String>,
    #[serde(default)]
    pub completed_utc: Option<String>,
    pub state: SessionState,
    pub progress: f64,
    pub frames_total: u64,
    pub frames_cooking: u64,
    pub frames_paused: u64,
    pub pauses: u64,
    pub intensity: IntensitySummary,
    pub frame_pacing: FramePacingSummary,
    pub config: CookingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_color_switches_on_warning_band_only() {
        assert_eq!(ProgressColor::for_progress(0.0), ProgressColor::Nominal);
        assert_eq!(ProgressColor::for_progress(0.69), ProgressColor::Nominal);
        assert_eq!(ProgressColor::for_progress(0.7), ProgressColor::Warning);
        assert_eq!(ProgressColor::for_progress(0.99), ProgressColor::Warning);
        assert_eq!(ProgressColor::for_progress(1.0), ProgressColor::Nominal);
    }

    #[test]
    fn default_config_is_valid() {
        CookingConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn rejects_zero_base_step() {
        let cfg = CookingConfig {
            base_step: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_residual_above_one() {
        let cfg = CookingConfig {
            residual_simmer: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_reads_humantime_durations() {
        let cfg: CookingConfig =
            serde_json::from_str(r#"{"fade_period":"100ms","frame_interval":"33ms"}"#)
                .expect("parse");
        assert_eq!(cfg.fade_period, Duration::from_millis(100));
        assert_eq!(cfg.frame_interval, Duration::from_millis(33));
        assert_eq!(cfg.base_step, 5e-4);
    }
}
