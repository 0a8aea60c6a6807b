use serde::{Deserialize, Serialize};

use crate::model::ProgressColor;

/// Fire-and-forget setters for everything that draws or plays the kitchen.
pub trait EffectSink {
    fn set_fire_opacity(&mut self, opacity: f64);
    fn set_fire_frequency(&mut self, frequency: f64);
    fn set_steam_opacity(&mut self, opacity: f64);
    fn set_steam_frequency(&mut self, frequency: f64);
    fn set_soup_boil(&mut self, frequency: f64, speed: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_progress(&mut self, scale: f64, color: ProgressColor);
    fn set_cooked_visible(&mut self, visible: bool);
    /// Shader time in seconds; keeps advancing whatever the session does.
    fn set_time(&mut self, seconds: f64);
}

/// Plain-data scene: the last value pushed through every setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub fire_opacity: f64,
    pub fire_frequency: f64,
    pub steam_opacity: f64,
    pub steam_frequency: f64,
    pub boil_frequency: f64,
    pub boil_speed: f64,
    pub volume: f64,
    pub progress_scale: f64,
    pub progress_color: ProgressColor,
    pub cooked_visible: bool,
    pub time_s: f64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            fire_opacity: 0.0,
            fire_frequency: 0.0,
            steam_opacity: 0.0,
            steam_frequency: 0.0,
            boil_frequency: 0.0,
            boil_speed: 0.0,
            volume: 0.0,
            progress_scale: 0.0,
            progress_color: ProgressColor::Nominal,
            cooked_visible: false,
            time_s: 0.0,
        }
    }
}

impl EffectSink for SceneState {
    fn set_fire_opacity(&mut self, opacity: f64) {
        self.fire_opacity = opacity;
    }

    fn set_fire_frequency(&mut self, frequency: f64) {
        self.fire_frequency = frequency;
    }

    fn set_steam_opacity(&mut self, opacity: f64) {
        self.steam_opacity = opacity;
    }

    fn set_steam_frequency(&mut self, frequency: f64) {
        self.steam_frequency = frequency;
    }

    fn set_soup_boil(&mut self, frequency: f64, speed: f64) {
        self.boil_frequency = frequency;
        self.boil_speed = speed;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_progress(&mut self, scale: f64, color: ProgressColor) {
        self.progress_scale = scale;
        self.progress_color = color;
    }

    fn set_cooked_visible(&mut self, visible: bool) {
        self.cooked_visible = visible;
    }

    fn set_time(&mut self, seconds: f64) {
        self.time_s = seconds;
    }
}
