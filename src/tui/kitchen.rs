use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::canvas::{Canvas, Context, Line as CanvasLine, Points, Rectangle},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use rand::Rng;

use super::state::{push_wrapped_status_kv, ButtonPanel, UiState};
use crate::engine::{SceneState, BOIL_FREQUENCY_SCALE};
use crate::model::{ProgressColor, SessionState};

const POT_LEFT: f64 = 30.0;
const POT_RIGHT: f64 = 70.0;
const POT_BOTTOM: f64 = 12.0;
const POT_TOP: f64 = 38.0;
const SOUP_LEVEL: f64 = 33.0;
const FLAME_BASE: f64 = 2.0;

/// Flame tint for a given fire opacity; `None` once the fire is out.
pub fn flame_color(opacity: f64) -> Option<Color> {
    if opacity <= 0.0 {
        None
    } else if opacity > 0.75 {
        Some(Color::LightYellow)
    } else if opacity > 0.5 {
        Some(Color::Yellow)
    } else if opacity > 0.25 {
        Some(Color::LightRed)
    } else {
        Some(Color::Red)
    }
}

pub fn gauge_color(color: ProgressColor) -> Color {
    match color {
        ProgressColor::Nominal => Color::Green,
        ProgressColor::Warning => Color::Yellow,
    }
}

/// Height of one flame tongue before flicker.
pub fn flame_height(frequency: f64) -> f64 {
    3.0 + 8.0 * frequency.clamp(0.0, 1.0)
}

/// Soup surface height at `x`. Flat when the pot is not boiling.
pub fn soup_surface(x: f64, scene: &SceneState) -> f64 {
    if scene.boil_frequency <= 0.0 {
        return SOUP_LEVEL;
    }
    let amp = 1.5 * (scene.boil_frequency / BOIL_FREQUENCY_SCALE).clamp(0.0, 1.0);
    SOUP_LEVEL + amp * (x * 0.6 + scene.time_s * (1.0 + scene.boil_speed)).sin()
}

fn draw_line(ctx: &mut Context, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
    ctx.draw(&CanvasLine {
        x1,
        y1,
        x2,
        y2,
        color,
    });
}

fn paint_scene(ctx: &mut Context, scene: &SceneState) {
    // Flames under the pot. Flicker is cosmetic and drawn fresh every frame.
    if let Some(color) = flame_color(scene.fire_opacity) {
        let mut rng = rand::thread_rng();
        let base = flame_height(scene.fire_frequency) * scene.fire_opacity.clamp(0.0, 1.0);
        let mut x = POT_LEFT + 2.0;
        while x <= POT_RIGHT - 2.0 {
            let flicker: f64 = rng.gen_range(0.7..=1.0);
            draw_line(ctx, x, FLAME_BASE, x, FLAME_BASE + base * flicker, color);
            x += 3.0;
        }
    }

    // Burner and pot.
    draw_line(ctx, POT_LEFT - 4.0, FLAME_BASE, POT_RIGHT + 4.0, FLAME_BASE, Color::DarkGray);
    ctx.draw(&Rectangle {
        x: POT_LEFT,
        y: POT_BOTTOM,
        width: POT_RIGHT - POT_LEFT,
        height: POT_TOP - POT_BOTTOM,
        color: Color::Gray,
    });

    // Soup surface.
    let surface: Vec<(f64, f64)> = (0..=80)
        .map(|i| {
            let x = POT_LEFT + 0.5 + i as f64 * (POT_RIGHT - POT_LEFT - 1.0) / 80.0;
            (x, soup_surface(x, scene))
        })
        .collect();
    ctx.draw(&Points {
        coords: &surface,
        color: Color::LightGreen,
    });

    // Steam rising from the pot.
    if scene.steam_opacity > 0.0 {
        let columns = 3 + (scene.steam_frequency.clamp(0.0, 1.0) * 6.0).round() as usize;
        let height = 10.0 + 40.0 * scene.steam_opacity.clamp(0.0, 1.0);
        let color = if scene.steam_opacity > 0.5 {
            Color::White
        } else {
            Color::Gray
        };
        let mut wisps = Vec::new();
        for c in 0..columns {
            let x0 = POT_LEFT + 4.0 + c as f64 * (POT_RIGHT - POT_LEFT - 8.0) / columns as f64;
            let mut y = POT_TOP + 2.0;
            while y < POT_TOP + height {
                let drift = (y * 0.3 + scene.time_s * (1.0 + scene.steam_frequency) + c as f64).sin();
                wisps.push((x0 + 2.0 * drift, y));
                y += 2.0;
            }
        }
        ctx.draw(&Points {
            coords: &wisps,
            color,
        });
    }

    if scene.cooked_visible {
        ctx.print(
            44.0,
            80.0,
            Line::styled(
                "COOKED!",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }
}

fn button_spans(buttons: ButtonPanel) -> Vec<Span<'static>> {
    let key = Style::default().fg(Color::Magenta);
    let mut spans = Vec::new();
    let mut push = |k: &'static str, label: &'static str| {
        spans.push(Span::styled(format!("[{k}]"), key));
        spans.push(Span::raw(format!(" {label}   ")));
    };
    if buttons.cook {
        push("c", "Cook");
    }
    if buttons.stop {
        push("s", "Stop");
    }
    if buttons.resume {
        push("r", "Resume");
    }
    if buttons.reset {
        push("x", "Reset");
    }
    push("←/→", "Fire");
    push("e", "Export");
    spans
}

fn slider_bar(value: f64, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    )
}

fn state_color(state: SessionState) -> Color {
    match state {
        SessionState::Idle => Color::Gray,
        SessionState::Cooking => Color::LightRed,
        SessionState::Paused => Color::Yellow,
        SessionState::Cooked => Color::LightGreen,
    }
}

pub fn draw_kitchen(area: Rect, f: &mut Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(rows[0]);

    let scene = state
        .last_frame
        .as_ref()
        .map(|s| s.scene.clone())
        .unwrap_or_default();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Kitchen"))
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(|ctx| paint_scene(ctx, &scene));
    f.render_widget(canvas, top[0]);

    draw_status(top[1], f, state, &scene);

    let progress = state.progress().clamp(0.0, 1.0);
    let label = if scene.cooked_visible {
        "COOKED!".to_string()
    } else {
        format!("{:.0}%", progress * 100.0)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Doneness"))
        .gauge_style(Style::default().fg(gauge_color(scene.progress_color)))
        .ratio(scene.progress_scale.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, rows[1]);

    let buttons = Paragraph::new(Line::from(button_spans(state.buttons)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(buttons, rows[2]);
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState, scene: &SceneState) {
    let snap = state.last_frame.as_ref();
    let enabled = snap.map(|s| s.intensity_enabled).unwrap_or(false);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("State: ", Style::default().fg(Color::Gray)),
            Span::styled(
                state.state.label(),
                Style::default()
                    .fg(state_color(state.state))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Progress: {:.1}%", state.progress() * 100.0)),
        Line::from(format!(
            "Rate: {:.2}x",
            snap.map(|s| s.rate).unwrap_or(0.0)
        )),
        Line::from(vec![
            Span::styled("Fire: ", Style::default().fg(Color::Gray)),
            Span::raw(slider_bar(state.slider, 10)),
            Span::raw(format!(" {:.0}%", state.slider * 100.0)),
            if enabled {
                Span::raw("")
            } else {
                Span::styled(" (off)", Style::default().fg(Color::DarkGray))
            },
        ]),
        Line::from(format!(
            "Flames: {:.0}%  Steam: {:.0}%",
            scene.fire_opacity * 100.0,
            scene.steam_opacity * 100.0
        )),
        Line::from(format!(
            "Boil: {:.1} @ {:.1}  Volume: {:.0}%",
            scene.boil_frequency,
            scene.boil_speed,
            scene.volume * 100.0
        )),
        Line::from(format!("Frame: {}", snap.map(|s| s.frame).unwrap_or(0))),
    ];
    if let Some(frame) = state.cooked_at_frame {
        lines.push(Line::from(format!("Cooked at frame {frame}")));
    }
    if snap.map(|s| s.fade_active).unwrap_or(false) {
        lines.push(Line::styled(
            "Fire dying down…",
            Style::default().fg(Color::LightRed),
        ));
    }
    if let Some(path) = state.log_path.as_ref() {
        push_wrapped_status_kv(&mut lines, "Log", &path.display().to_string(), area.width);
    }
    if !state.info.is_empty() {
        lines.push(Line::from(""));
        push_wrapped_status_kv(&mut lines, "Info", &state.info, area.width);
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}
