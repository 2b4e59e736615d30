use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    /// Pause before the web UI's division result comes back, so the
    /// loading pulse has something to show
    pub division_delay_ms: u64,
    /// Where `serve` mirrors each division as CSV, if anywhere
    pub results_csv: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            port: 8080,
            division_delay_ms: 1500,
            results_csv: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind_address: Option<String>,
    port: Option<u16>,
    division_delay_ms: Option<u64>,
    results_csv: Option<PathBuf>,
}

impl Config {
    /// Overlays the fields a TOML document sets
    pub fn merge_toml(&mut self, text: &str) -> Result<(), ConfigError> {
        let f: FileConfig = toml::from_str(text)?;
        if let Some(v) = f.bind_address {
            self.bind_address = v;
        }
        if let Some(v) = f.port {
            self.port = v;
        }
        if let Some(v) = f.division_delay_ms {
            self.division_delay_ms = v;
        }
        if let Some(v) = f.results_csv {
            self.results_csv = Some(v);
        }
        Ok(())
    }

    /// Overlays environment-style values; `lookup` returns the value of a variable
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("TREASURE_BIND").filter(|v| !v.is_empty()) {
            self.bind_address = bind;
        }
        if let Some(port) = lookup("TREASURE_PORT").filter(|v| !v.is_empty()) {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("TREASURE_PORT={}", port)))?;
        }
        if let Some(delay) = lookup("TREASURE_DELAY_MS").filter(|v| !v.is_empty()) {
            self.division_delay_ms = delay
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("TREASURE_DELAY_MS={}", delay)))?;
        }
        if let Some(path) = lookup("TREASURE_RESULTS_CSV").filter(|v| !v.is_empty()) {
            self.results_csv = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

/// Defaults, then the TOML file named by `TREASURE_CONFIG`, then
/// `TREASURE_*` environment variables
pub fn load() -> Result<Config, ConfigError> {
    let mut cfg = Config::default();
    if let Ok(path) = std::env::var("TREASURE_CONFIG") {
        let s = fs::read_to_string(path)?;
        cfg.merge_toml(&s)?;
    }
    cfg.merge_env(|key| std::env::var(key).ok())?;
    Ok(cfg)
}
