use crate::orchestrator::UiCommand;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

use super::state::UiState;

/// Exports land in the working directory the TUI was started from.
pub fn export_dir() -> Result<PathBuf> {
    std::env::current_dir().context("resolve current directory")
}

/// Ask the controller to write the current summary. The outcome comes back
/// as an info event.
pub fn request_export(cmd_tx: &UnboundedSender<UiCommand>, state: &mut UiState) {
    match export_dir() {
        Ok(dir) => {
            state.info = "Exporting…".into();
            let _ = cmd_tx.send(UiCommand::Export(dir));
        }
        Err(e) => {
            state.info = format!("Export JSON failed: {e:#}");
        }
    }
}
