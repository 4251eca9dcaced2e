use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "launch-ledger";
const CONFIG_FILE: &str = "config.json";

pub const ENV_DATA: &str = "LAUNCH_LEDGER_DATA";
pub const ENV_BIND: &str = "LAUNCH_LEDGER_BIND";
pub const ENV_PORT: &str = "LAUNCH_LEDGER_PORT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV file holding the mission table
    pub data_path: PathBuf,
    /// Address the HTTP API binds to
    pub bind: String,
    pub port: u16,
    /// Number of companies returned by `/companies/top` when `n` is omitted.
    pub default_top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/space_missions.csv"),
            bind: "127.0.0.1".to_string(),
            port: 3000,
            default_top_n: 3,
        }
    }
}

impl AppConfig {
    /// Load the user's config file, then apply environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps an environment variable name
    /// to its value. Unparseable ports are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_DATA) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind;
        }
        match lookup(ENV_PORT).map(|p| p.parse::<u16>()) {
            Some(Ok(port)) => self.port = port,
            Some(Err(e)) => tracing::warn!("Ignoring {}: {}", ENV_PORT, e),
            None => {}
        }
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn get_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
