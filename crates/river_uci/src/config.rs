use std::path::Path;

use anyhow::Context;
use river_core::MAX_DEPTH;
use serde::Deserialize;

/// Environment variable naming a config file when no path is given on the
/// command line.
pub const CONFIG_ENV: &str = "RIVER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Identification
    pub name: String,
    pub author: String,

    // Search Parameters
    pub max_depth: u8,
    pub nodes_per_tick: u32, // Coordinator steps per protocol tick

    /// Initial state of `debug on|off`.
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "River".to_string(),
            author: "River developers".to_string(),
            max_depth: 4,
            nodes_per_tick: 512,
            debug: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = toml::from_str(text).context("invalid engine config")?;
        Ok(config.normalized())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config named by `arg`, else by `RIVER_CONFIG`, else the defaults.
    pub fn load(arg: Option<&str>) -> anyhow::Result<Self> {
        let path = match arg {
            Some(path) => Some(path.to_string()),
            None => std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()),
        };
        match path {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Clamp numeric fields into their working ranges.
    pub fn normalized(mut self) -> Self {
        self.max_depth = self.max_depth.clamp(1, MAX_DEPTH);
        self.nodes_per_tick = self.nodes_per_tick.max(1);
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
