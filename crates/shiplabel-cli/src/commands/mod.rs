//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod inspect;

use std::path::{Path, PathBuf};

use tracing::debug;

use shiplabel_core::LabelConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shiplabel")
        .join("config.json")
}

/// Load the configuration given with `--config`, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LabelConfig> {
    let config = match config_path {
        Some(path) => read_config(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                read_config(&path)?
            } else {
                LabelConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<LabelConfig> {
    debug!("Loading configuration from {}", path.display());
    LabelConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}
