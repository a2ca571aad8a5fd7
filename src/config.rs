use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "ecotourist";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP API binds to
    pub host: String,
    /// Port for the HTTP API
    pub port: u16,
    /// How long the "+N Coins!" feedback stays visible after a completion.
    pub feedback_duration_ms: u64,
    /// Custom catalog file. The built-in reference catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            feedback_duration_ms: 1000,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the user's config directory, then apply
    /// `ECOTOURIST_*` environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Apply overrides looked up by variable name. Unparseable values are
    /// ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("ECOTOURIST_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("ECOTOURIST_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid ECOTOURIST_PORT: {}", port),
            }
        }
        if let Some(ms) = lookup("ECOTOURIST_FEEDBACK_MS") {
            match ms.parse() {
                Ok(ms) => self.feedback_duration_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid ECOTOURIST_FEEDBACK_MS: {}", ms),
            }
        }
        if let Some(path) = lookup("ECOTOURIST_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
