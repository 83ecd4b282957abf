//! Client configuration.
//!
//! The backend base URL comes from, in order: the `CALLBOARD_API_URL`
//! environment variable, `~/.config/callboard/config.toml`, or the
//! development default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

static DEFAULT_API_URL: &str = "https://localhost:7078/api";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Configuration at ~/.config/callboard/config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("callboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve configuration from the environment and config file.
    pub fn load() -> Result<Self> {
        if let Ok(url) = std::env::var("CALLBOARD_API_URL")
            && !url.trim().is_empty()
        {
            return Ok(Config {
                api_url: normalize_base_url(&url),
            });
        }

        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.api_url = normalize_base_url(&config.api_url);
        Ok(config)
    }
}

/// Strip a trailing slash so paths can always be appended as `/path`.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_api_url() {
        assert_eq!(Config::default().api_url, "https://localhost:7078/api");
    }

    #[test]
    fn test_load_from_file_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "api_url = \"https://theatre.example/api/\"").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://theatre.example/api");
    }

    #[test]
    fn test_load_from_empty_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
