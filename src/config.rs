//! Config file layer: built-in defaults, then `config.toml`, then CLI flags.

use crate::model::CookingConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub cooking: CookingConfig,
    pub log_level: Option<String>,
    pub cook_on_launch: Option<bool>,
}

/// `<config dir>/soup-cook/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("soup-cook").join("config.toml"))
}

pub fn parse_file_config(raw: &str) -> Result<FileConfig> {
    toml::from_str(raw).context("parse config file")
}

/// Load the config file. An explicit path must exist; the default path is
/// optional and silently skipped when absent.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read config file {}", path.display()))?;
    parse_file_config(&raw).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = parse_file_config("").expect("parse");
        assert_eq!(cfg.cooking, CookingConfig::default());
        assert!(cfg.log_level.is_none());
        assert!(cfg.cook_on_launch.is_none());
    }

    #[test]
    fn partial_cooking_table_keeps_other_defaults() {
        let cfg = parse_file_config(
            r#"
log_level = "debug"
cook_on_launch = true

[cooking]
base_step = 0.001
fade_period = "80ms"
"#,
        )
        .expect("parse");
        assert_eq!(cfg.cooking.base_step, 0.001);
        assert_eq!(cfg.cooking.fade_period, Duration::from_millis(80));
        assert_eq!(cfg.cooking.fade_step, 0.05);
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.cook_on_launch, Some(true));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_file_config("[cooking\nbase_step = ").is_err());
        assert!(parse_file_config("[cooking]\nfade_period = \"soon\"").is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let missing = std::env::temp_dir().join(format!("soup_cook_missing_{suffix}.toml"));
        let err = load_file_config(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("read config file"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("soup_cook_config_{suffix}.toml"));
        std::fs::write(&path, "[cooking]\nresidual_simmer = 0.2\n").expect("write");
        let cfg = load_file_config(Some(&path)).expect("load");
        assert_eq!(cfg.cooking.residual_simmer, 0.2);
        std::fs::remove_file(path).expect("cleanup");
    }
}
