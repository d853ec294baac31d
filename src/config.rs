use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Report floor: matches below this duplication percentage are dropped
    /// from the result. 0.0 reports every non-empty intersection.
    #[serde(default = "default_min_percentage")]
    pub min_percentage: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_percentage: default_min_percentage(),
        }
    }
}

fn default_min_percentage() -> f32 {
    0.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if !(0.0..=100.0).contains(&config.analysis.min_percentage) {
        anyhow::bail!("analysis.min_percentage must be in [0.0, 100.0]");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}
