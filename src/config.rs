//! moneta configuration
//!
//! Config loading priority:
//! 1. `moneta.json` in the app root
//! 2. Built-in defaults
//!
//! The app root is `MONETA_HOME` when set, otherwise the current directory.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name in the app root
pub const CONFIG_FILE: &str = "moneta.json";

/// Environment variable overriding the app root
pub const APP_HOME_ENV: &str = "MONETA_HOME";

/// Default Model2Vec model ID
pub const DEFAULT_MODEL_ID: &str = "minishlab/potion-multilingual-128M";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub alerts: AlertConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Labeled-corpus location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

fn default_csv_path() -> String {
    "data/transactions.csv".to_string()
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

/// Embedding backend selection
///
/// With `advanced` off, the built-in deterministic hash embedder is used and
/// no model download is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub advanced: bool,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default)]
    pub model_path: Option<String>,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            advanced: false,
            model_id: default_model_id(),
            model_path: None,
        }
    }
}

/// Category matcher thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_min_score() -> f32 {
    0.25
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
        }
    }
}

/// Alert thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_high_value_threshold")]
    pub high_value_threshold: f64,
}

fn default_high_value_threshold() -> f64 {
    5000.0
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: default_high_value_threshold(),
        }
    }
}

/// HTTP API settings (used by the `server` feature)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: vec![],
        }
    }
}

impl Config {
    /// Load config from the app root, falling back to defaults on any failure.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to load {}: {}. Using defaults.",
                        CONFIG_FILE, e
                    );
                }
            }
        }

        Self::default()
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let config_path = root.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }
}

/// Get the app root from the environment variable or current directory.
pub fn get_app_root() -> PathBuf {
    if let Ok(path) = std::env::var(APP_HOME_ENV) {
        let root = PathBuf::from(&path);
        if root.exists() {
            return root;
        }
        eprintln!(
            "Warning: {} is set to '{}' but path does not exist. Falling back to current directory.",
            APP_HOME_ENV, path
        );
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.knowledge.csv_path, "data/transactions.csv");
        assert_eq!(config.matcher.min_score, 0.25);
        assert_eq!(config.alerts.high_value_threshold, 5000.0);
        assert_eq!(config.server.port, 5000);
        assert!(!config.model.advanced);
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{"server": {"port": 8080}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_parse_matcher_override() {
        let json = r#"{"matcher": {"min_score": 0.4}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.matcher.min_score, 0.4);
    }
}
