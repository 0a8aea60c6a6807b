//! Interactive session driver.
//!
//! Owns the session controller on the runtime, applies UI commands between
//! frames and streams frame snapshots back to the presentation layer.

use super::post_process::{default_export_path, export_summary_json};
use super::session::{SessionController, SessionObserver};
use crate::engine::{Clock, FrameClock, SceneState};
use crate::model::{CookingConfig, InfoEvent, SessionEvent, SessionState, SessionSummary};
use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Commands emitted by UI layers to drive the session.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Start,
    Stop,
    Resume,
    Reset,
    SetIntensity(f64),
    /// Write the current summary into this directory.
    Export(PathBuf),
    Quit,
}

/// Forwards session notifications onto the presentation event channel.
pub(crate) struct ChannelObserver {
    tx: UnboundedSender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_transition(&mut self, from: SessionState, to: SessionState) {
        let _ = self.tx.send(SessionEvent::StateChanged { from, to });
    }

    fn on_completed(&mut self) {
        let _ = self.tx.send(SessionEvent::Completed);
    }

    fn on_info(&mut self, info: &InfoEvent) {
        let _ = self.tx.send(SessionEvent::Info(info.clone()));
    }
}

/// Apply one UI command. Returns false when the UI asked to quit.
pub(crate) fn apply_command(
    session: &mut SessionController<SceneState>,
    cmd: UiCommand,
    event_tx: &UnboundedSender<SessionEvent>,
) -> bool {
    match cmd {
        UiCommand::Start => {
            session.start();
        }
        UiCommand::Stop => {
            session.stop();
        }
        UiCommand::Resume => {
            session.resume();
        }
        UiCommand::Reset => {
            session.reset();
        }
        UiCommand::SetIntensity(v) => {
            session.set_intensity(v);
        }
        UiCommand::Export(dir) => {
            let summary = session.summary();
            let path = default_export_path(&dir, &summary);
            let msg = match export_summary_json(&path, &summary) {
                Ok(()) => {
                    info!(path = %path.display(), "summary exported");
                    format!("Exported JSON: {}", path.display())
                }
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "summary export failed");
                    format!("Export JSON failed: {e:#}")
                }
            };
            let _ = event_tx.send(SessionEvent::Info(InfoEvent::Message(msg)));
        }
        UiCommand::Quit => return false,
    }
    true
}

/// Run the frame loop until the UI quits or drops its command channel.
/// Returns the summary of the session as it stood at shutdown.
pub(crate) async fn run_controller(
    cfg: CookingConfig,
    cook_on_launch: bool,
    event_tx: UnboundedSender<SessionEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<SessionSummary> {
    let frame_interval = cfg.frame_interval;
    let mut session = SessionController::new(cfg, SceneState::default())
        .with_observer(ChannelObserver::new(event_tx.clone()));
    let clock = FrameClock::new();

    if cook_on_launch {
        session.start();
    }

    let mut frames = tokio::time::interval(frame_interval);
    // A slow terminal should drop frames, not replay them in a burst.
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(cmd) => {
                        debug!(?cmd, "ui command");
                        if !apply_command(&mut session, cmd, &event_tx) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = frames.tick() => {
                session.update(clock.elapsed_ms());
                let snapshot = Box::new(session.snapshot());
                if event_tx.send(SessionEvent::Frame { snapshot }).is_err() {
                    break;
                }
            }
        }
    }

    let summary = session.summary();
    info!(
        session = %summary.session_id,
        state = summary.state.label(),
        progress = summary.progress,
        "controller stopped"
    );
    Ok(summary)
}
