mod export;
mod help;
mod kitchen;
mod state;

use crate::cli::Cli;
use crate::model::{CookingConfig, SessionEvent, SessionState};
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Terminal,
};
use std::path::PathBuf;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use state::UiState;

pub async fn run(
    args: Cli,
    cfg: CookingConfig,
    cook_on_launch: bool,
    log_path: Option<PathBuf>,
) -> Result<()> {
    // Unbounded channels avoid backpressure and task switching in the hot path.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let slider_step = cfg.intensity_step;
    let ui_handle =
        std::thread::spawn(move || run_threaded(slider_step, log_path, event_rx, cmd_tx));

    let res = orchestrator::run_controller(cfg, cook_on_launch, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    // The terminal is restored by now, so export messages can go to stderr.
    let summary = res?;
    let processed = orchestrator::process_session_completion(args.export_json.as_deref(), summary);
    for msg in processed.export_messages {
        eprintln!("{msg}");
    }
    Ok(())
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    slider_step: f64,
    log_path: Option<PathBuf>,
    mut event_rx: UnboundedReceiver<SessionEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState {
        slider_step,
        log_path,
        ..Default::default()
    };

    let tick_rate = Duration::from_millis(33);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive; unbounded channel avoids backpressure.
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if !handle_key(&mut state, k.modifiers, k.code, &cmd_tx) {
                    break Ok(());
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

/// Map one key press onto UI state and session commands. Returns false on quit.
fn handle_key(
    state: &mut UiState,
    modifiers: KeyModifiers,
    code: KeyCode,
    cmd_tx: &UnboundedSender<UiCommand>,
) -> bool {
    match (modifiers, code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            let _ = cmd_tx.send(UiCommand::Quit);
            return false;
        }
        (_, KeyCode::Char('c')) => {
            if state.buttons.cook {
                let _ = cmd_tx.send(UiCommand::Start);
            } else {
                state.info = "Cook is only available from idle".into();
            }
        }
        (_, KeyCode::Char('s')) => {
            if state.buttons.stop {
                let _ = cmd_tx.send(UiCommand::Stop);
            } else {
                state.info = "Nothing to stop".into();
            }
        }
        (_, KeyCode::Char('r')) => {
            if state.buttons.resume {
                let _ = cmd_tx.send(UiCommand::Resume);
            } else {
                state.info = "Resume is only available while paused".into();
            }
        }
        (_, KeyCode::Char('x')) => {
            if state.buttons.reset {
                let _ = cmd_tx.send(UiCommand::Reset);
            } else {
                state.info = "Stop the fire before resetting".into();
            }
        }
        (_, KeyCode::Left) | (_, KeyCode::Char('-')) => {
            let v = state.nudge_slider(-1.0);
            let _ = cmd_tx.send(UiCommand::SetIntensity(v));
        }
        (_, KeyCode::Right) | (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => {
            let v = state.nudge_slider(1.0);
            let _ = cmd_tx.send(UiCommand::SetIntensity(v));
        }
        (_, KeyCode::Char('e')) => export::request_export(cmd_tx, state),
        (_, KeyCode::Tab) => {
            state.tab = (state.tab + 1) % 2;
        }
        (_, KeyCode::Char('?')) => {
            state.tab = 1;
        }
        _ => {}
    }
    true
}

fn apply_event(state: &mut UiState, ev: SessionEvent) {
    match ev {
        SessionEvent::StateChanged { from, to } => {
            state.enter_state(to);
            state.info = format!("{} -> {}", from.label(), to.label());
        }
        SessionEvent::Completed => {
            state.cooked_at_frame = state.last_frame.as_ref().map(|s| s.frame);
            state.info = "Soup is cooked!".into();
        }
        SessionEvent::Frame { snapshot } => {
            if snapshot.state != state.state {
                // Buttons follow the engine even if a transition event was dropped.
                state.enter_state(snapshot.state);
            }
            state.apply_frame(*snapshot);
        }
        SessionEvent::Info(info) => {
            state.info = info.to_message();
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let title = match state.state {
        SessionState::Idle => "soup-cook".to_string(),
        other => format!("soup-cook · {}", other.label()),
    };
    let tabs = Tabs::new(vec![Line::from("Kitchen"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => kitchen::draw_kitchen(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}
