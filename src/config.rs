use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::melody::ClassifierParams;

const LOCAL_CONFIG: &str = "melodica.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierParams,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Explicit path, else `./melodica.toml`, else the user config directories.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("melodica").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("melodica").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}
