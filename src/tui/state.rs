use crate::model::{FrameSnapshot, SessionState};
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};
use std::path::PathBuf;

/// Which controls are offered to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPanel {
    pub cook: bool,
    pub stop: bool,
    pub resume: bool,
    pub reset: bool,
}

impl ButtonPanel {
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Idle => Self {
                cook: true,
                stop: false,
                resume: false,
                reset: false,
            },
            SessionState::Cooking => Self {
                cook: false,
                stop: true,
                resume: false,
                reset: false,
            },
            SessionState::Paused => Self {
                cook: false,
                stop: false,
                resume: true,
                reset: true,
            },
            SessionState::Cooked => Self {
                cook: false,
                stop: false,
                resume: false,
                reset: true,
            },
        }
    }
}

impl Default for ButtonPanel {
    fn default() -> Self {
        Self::for_state(SessionState::Idle)
    }
}

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub state: SessionState,
    pub buttons: ButtonPanel,
    /// Operator's slider position. Follows the engine while the control is live.
    pub slider: f64,
    pub slider_step: f64,
    pub last_frame: Option<FrameSnapshot>,
    pub cooked_at_frame: Option<u64>,
    pub log_path: Option<PathBuf>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            info: String::new(),
            state: SessionState::Idle,
            buttons: ButtonPanel::default(),
            slider: 0.0,
            slider_step: 0.05,
            last_frame: None,
            cooked_at_frame: None,
            log_path: None,
        }
    }
}

impl UiState {
    pub fn enter_state(&mut self, to: SessionState) {
        self.state = to;
        self.buttons = ButtonPanel::for_state(to);
        if to == SessionState::Idle {
            self.slider = 0.0;
            self.cooked_at_frame = None;
        }
    }

    pub fn apply_frame(&mut self, snapshot: FrameSnapshot) {
        if snapshot.intensity_enabled {
            self.slider = snapshot.intensity;
        }
        self.last_frame = Some(snapshot);
    }

    /// Move the slider by `steps` key presses and return the new position.
    pub fn nudge_slider(&mut self, steps: f64) -> f64 {
        self.slider = (self.slider + steps * self.slider_step).clamp(0.0, 1.0);
        self.slider
    }

    pub fn progress(&self) -> f64 {
        self.last_frame.as_ref().map(|s| s.progress).unwrap_or(0.0)
    }
}

pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = status_area_width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let chars_to_take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(chars_to_take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(line_text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(line_text)]));
        }

        remaining = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SceneState;

    fn frame(intensity: f64, enabled: bool) -> FrameSnapshot {
        FrameSnapshot {
            frame: 1,
            state: SessionState::Cooking,
            progress: 0.25,
            rate: 0.5 + 1.5 * intensity,
            intensity,
            intensity_enabled: enabled,
            fade_active: false,
            scene: SceneState::default(),
        }
    }

    #[test]
    fn buttons_follow_session_state() {
        let idle = ButtonPanel::for_state(SessionState::Idle);
        assert!(idle.cook && !idle.stop && !idle.resume && !idle.reset);

        let cooking = ButtonPanel::for_state(SessionState::Cooking);
        assert!(!cooking.cook && cooking.stop && !cooking.resume && !cooking.reset);

        let paused = ButtonPanel::for_state(SessionState::Paused);
        assert!(!paused.cook && !paused.stop && paused.resume && paused.reset);

        let cooked = ButtonPanel::for_state(SessionState::Cooked);
        assert!(!cooked.cook && !cooked.stop && !cooked.resume && cooked.reset);
    }

    #[test]
    fn slider_clamps_to_unit_range() {
        let mut s = UiState::default();
        assert_eq!(s.nudge_slider(-1.0), 0.0);
        for _ in 0..40 {
            s.nudge_slider(1.0);
        }
        assert_eq!(s.slider, 1.0);
    }

    #[test]
    fn slider_tracks_engine_only_while_enabled() {
        let mut s = UiState::default();
        s.apply_frame(frame(0.4, true));
        assert_eq!(s.slider, 0.4);

        s.slider = 0.9;
        s.apply_frame(frame(0.0, false));
        assert_eq!(s.slider, 0.9);
        assert_eq!(s.progress(), 0.25);
    }

    #[test]
    fn returning_to_idle_zeroes_the_slider() {
        let mut s = UiState::default();
        s.enter_state(SessionState::Cooking);
        s.slider = 0.7;
        s.cooked_at_frame = Some(10);
        s.enter_state(SessionState::Idle);
        assert_eq!(s.slider, 0.0);
        assert_eq!(s.cooked_at_frame, None);
        assert!(s.buttons.cook);
    }

    #[test]
    fn wraps_long_values_under_label() {
        let mut out = Vec::new();
        push_wrapped_status_kv(&mut out, "Log", "/a/very/long/path/to/the/log/file.log", 20);
        assert!(out.len() > 1);
        push_wrapped_status_kv(&mut out, "Empty", "   ", 20);
        let before = out.len();
        push_wrapped_status_kv(&mut out, "Empty", "", 20);
        assert_eq!(out.len(), before);
    }
}
