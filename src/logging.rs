//! Tracing setup. The TUI owns the terminal, so interactive runs log to a
//! file in the cache dir; headless runs log to stderr.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[cfg_attr(not(feature = "tui"), allow(dead_code))]
pub enum LogTarget {
    Stderr,
    File,
}

/// `<cache dir>/soup-cook/soup-cook.log`.
#[cfg_attr(not(feature = "tui"), allow(dead_code))]
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("soup-cook").join("soup-cook.log"))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. `RUST_LOG` wins over `level`.
/// Returns the log file path when logging to a file.
pub fn init(level: &str, target: LogTarget) -> Result<Option<PathBuf>> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .try_init();
            Ok(None)
        }
        LogTarget::File => {
            let Some(path) = log_file_path() else {
                // No cache dir: logging stays off.
                return Ok(None);
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            Ok(Some(path))
        }
    }
}
