use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::report::ReportLimits;

/// Address the upload server listens on when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Contents of `~/.config/flacwrap/config.toml`. Missing sections use their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Default length of each ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub top_songs: usize,
    pub top_artists: usize,
    pub top_albums: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let limits = ReportLimits::default();
        Self {
            top_songs: limits.songs,
            top_artists: limits.artists,
            top_albums: limits.albums,
        }
    }
}

impl ReportConfig {
    /// The configured lengths as pipeline limits.
    pub fn limits(&self) -> ReportLimits {
        ReportLimits {
            songs: self.top_songs,
            artists: self.top_artists,
            albums: self.top_albums,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// `$HOME/.config/flacwrap/config.toml`, relative to the working directory when `HOME` is unset.
fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("flacwrap")
        .join("config.toml")
}

/// Load the user config. A missing or broken file yields the defaults.
pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            warn!("ignoring {}: {:#}", path.display(), e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

/// Parse TOML config text. Absent keys take their defaults.
fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("invalid config file")
}

/// Write `config` to the config path, creating the directory if needed.
/// Returns the path written.
pub fn save_config(config: &Config) -> Result<PathBuf> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(path)
}
