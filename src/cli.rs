use crate::config::{self, FileConfig};
use crate::logging::{self, LogTarget};
use crate::model::{CookingConfig, SessionEvent, SessionState};
use crate::orchestrator::{self, SimulationScript};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "soup-cook",
    version,
    about = "Cook a pot of soup over an adjustable fire, in your terminal"
)]
pub struct Cli {
    /// Config file (defaults to <config dir>/soup-cook/config.toml when present)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Cook one session headless and print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Cook one session headless with a human-readable log
    #[arg(long)]
    pub text: bool,

    /// Fire intensity for headless runs, 0..1
    #[arg(long, default_value_t = 0.5)]
    pub intensity: f64,

    /// Headless: stop once progress reaches this value, then resume
    #[arg(long)]
    pub pause_at: Option<f64>,

    /// Headless: frames to stay paused when --pause-at triggers
    #[arg(long, default_value_t = 100)]
    pub pause_frames: u64,

    /// Headless: give up after this many frames
    #[arg(long, default_value_t = 200_000)]
    pub max_frames: u64,

    /// Progress per frame at the slowest rate multiplier of 1.0
    #[arg(long)]
    pub base_step: Option<f64>,

    /// Fire opacity removed per fade period once cooked
    #[arg(long)]
    pub fade_step: Option<f64>,

    /// Fade period (e.g. 50ms)
    #[arg(long)]
    pub fade_period: Option<humantime::Duration>,

    /// Steam/audio level held after the soup is cooked
    #[arg(long)]
    pub residual_simmer: Option<f64>,

    /// Frame interval (e.g. 16ms)
    #[arg(long)]
    pub frame_interval: Option<humantime::Duration>,

    /// Slider movement per key press in the TUI
    #[arg(long)]
    pub intensity_step: Option<f64>,

    /// Start cooking as soon as the TUI opens
    #[arg(long, action = clap::ArgAction::Set)]
    pub cook_on_launch: Option<bool>,

    /// Export the session summary as JSON
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn is_headless(&self) -> bool {
        self.json || self.text
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }

    let file = config::load_file_config(args.config.as_deref())?;
    let cfg = build_config(&args, &file)?;
    let level = args
        .log_level
        .clone()
        .or_else(|| file.log_level.clone())
        .unwrap_or_else(|| "info".into());

    if !args.is_headless() {
        #[cfg(feature = "tui")]
        {
            let log_path = logging::init(&level, LogTarget::File)?;
            let cook_on_launch = args.cook_on_launch.or(file.cook_on_launch).unwrap_or(false);
            return crate::tui::run(args, cfg, cook_on_launch, log_path).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            logging::init(&level, LogTarget::Stderr)?;
            return run_text(args, cfg).await;
        }
    }

    logging::init(&level, LogTarget::Stderr)?;
    if args.json {
        return run_json(args, cfg).await;
    }
    run_text(args, cfg).await
}

/// Layer CLI flags over the config file and validate the result.
pub fn build_config(args: &Cli, file: &FileConfig) -> Result<CookingConfig> {
    let mut cfg = file.cooking.clone();
    if let Some(v) = args.base_step {
        cfg.base_step = v;
    }
    if let Some(v) = args.fade_step {
        cfg.fade_step = v;
    }
    if let Some(v) = args.fade_period {
        cfg.fade_period = v.into();
    }
    if let Some(v) = args.residual_simmer {
        cfg.residual_simmer = v;
    }
    if let Some(v) = args.frame_interval {
        cfg.frame_interval = v.into();
    }
    if let Some(v) = args.intensity_step {
        cfg.intensity_step = v;
    }
    cfg.validate().context("invalid cooking configuration")?;
    Ok(cfg)
}

/// Build the headless script from CLI arguments.
pub fn build_script(args: &Cli) -> SimulationScript {
    SimulationScript {
        intensity: args.intensity,
        pause_at: args.pause_at,
        pause_frames: args.pause_frames,
        max_frames: args.max_frames,
    }
}

async fn run_json(args: Cli, cfg: CookingConfig) -> Result<()> {
    let script = build_script(&args);
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<SessionEvent>();

    let handle = tokio::task::spawn_blocking(move || {
        orchestrator::run_simulation(cfg, &script, evt_tx)
    });

    // Drain events so the channel does not grow for the whole run.
    while let Some(_ev) = evt_rx.recv().await {}

    let summary = handle
        .await
        .context("simulation task failed")?
        .context("cooking session failed")?;

    let processed = orchestrator::process_session_completion(args.export_json.as_deref(), summary);
    let out = serde_json::to_string_pretty(&processed.summary)?;
    let _ = out_tx.send(OutputLine::Stdout(out));
    for msg in processed.export_messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

async fn run_text(args: Cli, cfg: CookingConfig) -> Result<()> {
    let script = build_script(&args);
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<SessionEvent>();

    let handle = tokio::task::spawn_blocking(move || {
        orchestrator::run_simulation(cfg, &script, evt_tx)
    });

    let mut last_decile = 0u32;
    while let Some(ev) = evt_rx.recv().await {
        match ev {
            SessionEvent::StateChanged { from, to } => {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "== {} -> {} ==",
                    from.label(),
                    to.label()
                )));
                if to == SessionState::Idle {
                    last_decile = 0;
                }
            }
            SessionEvent::Frame { snapshot } => {
                let decile = (snapshot.progress * 10.0).floor() as u32;
                if decile > last_decile && snapshot.state != SessionState::Idle {
                    last_decile = decile;
                    let _ = out_tx.send(OutputLine::Stderr(format!(
                        "Progress: {:>3.0}% (rate {:.2}x, fire {:.0}%)",
                        snapshot.progress * 100.0,
                        snapshot.rate,
                        snapshot.intensity * 100.0
                    )));
                }
            }
            SessionEvent::Completed => {
                let _ = out_tx.send(OutputLine::Stderr("COOKED!".into()));
            }
            SessionEvent::Info(info) => {
                let _ = out_tx.send(OutputLine::Stderr(info.to_message()));
            }
        }
    }

    let summary = handle
        .await
        .context("simulation task failed")?
        .context("cooking session failed")?;

    let processed = orchestrator::process_session_completion(args.export_json.as_deref(), summary);
    let text = crate::text_summary::build_text_summary(&processed.summary);
    for line in text.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    for msg in processed.export_messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("soup-cook").chain(argv.iter().copied()))
            .expect("parse args")
    }

    #[test]
    fn flags_override_file_values() {
        let file = config::parse_file_config("[cooking]\nbase_step = 0.002\nfade_step = 0.1\n")
            .expect("parse");
        let args = parse(&["--base-step", "0.004", "--frame-interval", "33ms"]);
        let cfg = build_config(&args, &file).expect("config");
        assert_eq!(cfg.base_step, 0.004);
        assert_eq!(cfg.fade_step, 0.1);
        assert_eq!(cfg.frame_interval, Duration::from_millis(33));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let args = parse(&["--fade-step", "0"]);
        let err = build_config(&args, &FileConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("fade_step"));
    }

    #[test]
    fn headless_script_reads_pause_flags() {
        let args = parse(&["--text", "--intensity", "0.8", "--pause-at", "0.5"]);
        assert!(args.is_headless());
        let script = build_script(&args);
        assert_eq!(script.intensity, 0.8);
        assert_eq!(script.pause_at, Some(0.5));
        assert_eq!(script.pause_frames, 100);
    }

    #[test]
    fn cook_on_launch_takes_explicit_value() {
        let args = parse(&["--cook-on-launch", "true"]);
        assert_eq!(args.cook_on_launch, Some(true));
        assert!(!args.is_headless());
    }
}
