//! Text summary builder for CLI output.
//!
//! This module formats human-readable lines for text mode.

use crate::model::SessionSummary;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn fmt_opt(v: Option<f64>, scale: f64, precision: usize) -> String {
    v.map(|x| format!("{:.*}", precision, x * scale))
        .unwrap_or_else(|| "-".into())
}

/// Build a text summary from a finished session.
pub(crate) fn build_text_summary(summary: &SessionSummary) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!(
        "Session {}: {} at {:.1}%",
        summary.session_id,
        summary.state.label(),
        summary.progress * 100.0
    ));
    if let Some(started) = summary.started_utc.as_deref() {
        lines.push(format!("Started:   {started}"));
    }
    if let Some(done) = summary.completed_utc.as_deref() {
        lines.push(format!("Completed: {done}"));
    }

    let frame_ms = summary.config.frame_interval.as_secs_f64() * 1000.0;
    lines.push(format!(
        "Frames: {} total, {} cooking (~{:.1}s at {:.0} ms/frame), {} paused over {} pause(s)",
        summary.frames_total,
        summary.frames_cooking,
        summary.frames_cooking as f64 * frame_ms / 1000.0,
        frame_ms,
        summary.frames_paused,
        summary.pauses
    ));

    let i = &summary.intensity;
    lines.push(format!(
        "Fire: avg {}% med {}% p25 {}% p75 {}% ({} samples)",
        fmt_opt(i.mean, 100.0, 0),
        fmt_opt(i.median, 100.0, 0),
        fmt_opt(i.p25, 100.0, 0),
        fmt_opt(i.p75, 100.0, 0),
        i.samples
    ));

    let p = &summary.frame_pacing;
    lines.push(format!(
        "Frame pacing: avg {} med {} p25 {} p75 {} max {} ms",
        fmt_opt(p.mean_ms, 1.0, 1),
        fmt_opt(p.median_ms, 1.0, 1),
        fmt_opt(p.p25_ms, 1.0, 1),
        fmt_opt(p.p75_ms, 1.0, 1),
        fmt_opt(p.max_ms, 1.0, 1)
    ));

    TextSummary { lines }
}
