//! Post-session processing utilities.
//!
//! Handles summary export once a session has finished.

use crate::model::SessionSummary;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Result of post-session processing, ready for presentation layers.
pub(crate) struct ProcessedSession {
    pub summary: SessionSummary,
    pub export_messages: Vec<String>,
}

/// Write a session summary as pretty JSON, creating parent directories.
pub(crate) fn export_summary_json(path: &Path, summary: &SessionSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(summary).context("encode session summary")?;
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Default export file name: `soup-cook-<timestamp>-<session>.json` in `dir`.
pub(crate) fn default_export_path(dir: &Path, summary: &SessionSummary) -> PathBuf {
    let stamp = summary
        .completed_utc
        .as_deref()
        .or(summary.started_utc.as_deref())
        .unwrap_or("idle")
        .replace(':', "-")
        .replace('T', "_");
    dir.join(format!(
        "soup-cook-{}-{}.json",
        stamp,
        &summary.session_id[..8.min(summary.session_id.len())]
    ))
}

/// Process a finished session: run the requested export and collect messages.
pub(crate) fn process_session_completion(
    export_json: Option<&Path>,
    summary: SessionSummary,
) -> ProcessedSession {
    let mut export_messages = Vec::new();
    if let Some(path) = export_json {
        match export_summary_json(path, &summary) {
            Ok(()) => export_messages.push(format!("Exported JSON: {}", path.display())),
            Err(e) => export_messages.push(format!("Export JSON failed: {e:#}")),
        }
    }
    ProcessedSession {
        summary,
        export_messages,
    }
}
