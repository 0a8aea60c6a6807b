//! Headless session runs on a deterministic clock.

use super::controller::ChannelObserver;
use super::session::SessionController;
use crate::engine::{Clock, ManualClock, SceneState};
use crate::model::{CookingConfig, InfoEvent, SessionEvent, SessionState, SessionSummary};
use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Scripted operator behaviour for a headless run.
#[derive(Debug, Clone)]
pub(crate) struct SimulationScript {
    pub intensity: f64,
    /// Stop once progress reaches this value, then resume after `pause_frames`.
    pub pause_at: Option<f64>,
    pub pause_frames: u64,
    pub max_frames: u64,
}

impl Default for SimulationScript {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            pause_at: None,
            pause_frames: 100,
            max_frames: 200_000,
        }
    }
}

/// Cook one session to completion and let the fire burn out.
///
/// Emits transitions, info and every frame snapshot on `event_tx`.
pub(crate) fn run_simulation(
    cfg: CookingConfig,
    script: &SimulationScript,
    event_tx: UnboundedSender<SessionEvent>,
) -> Result<SessionSummary> {
    let mut clock = ManualClock::new(cfg.frame_interval);
    let mut session = SessionController::new(cfg, SceneState::default())
        .with_observer(ChannelObserver::new(event_tx.clone()));

    session.start();
    session.set_intensity(script.intensity);
    info!(
        intensity = session.intensity(),
        rate = session.rate(),
        "headless session started"
    );

    let mut paused_once = false;
    let mut frames = 0u64;
    loop {
        if frames >= script.max_frames {
            warn!(frames, progress = session.progress(), "frame budget exhausted");
            anyhow::bail!(
                "session did not finish within {} frames (progress {:.1}%)",
                script.max_frames,
                session.progress() * 100.0
            );
        }

        clock.tick();
        session.update(clock.elapsed_ms());
        frames += 1;
        let _ = event_tx.send(SessionEvent::Frame {
            snapshot: Box::new(session.snapshot()),
        });

        if let Some(at) = script.pause_at {
            if !paused_once && session.state() == SessionState::Cooking && session.progress() >= at
            {
                paused_once = true;
                session.stop();
                let _ = event_tx.send(SessionEvent::Info(InfoEvent::Message(format!(
                    "Pausing for {} frames",
                    script.pause_frames
                ))));
                for _ in 0..script.pause_frames {
                    clock.tick();
                    session.update(clock.elapsed_ms());
                    frames += 1;
                }
                session.resume();
            }
        }

        if session.state() == SessionState::Cooked && !session.effects().fade_active() {
            break;
        }
    }

    Ok(session.summary())
}
