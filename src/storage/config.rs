//! Configuration handling
//!
//! Configuration is stored in `~/.config/drift/config.toml` and read on
//! startup; every field has a default so the file is optional. The loaded
//! struct is passed down explicitly, never held as global state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::report::Thresholds;

fn default_date_format() -> String {
    "%b %-d, %Y".to_string()
}

/// User configuration for drift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding captured snapshots; defaults to the current
    /// working directory when unset
    pub state_dir: Option<PathBuf>,

    /// chrono format string for rendered dates
    pub date_format: String,

    /// Default delay classification thresholds in days
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: None,
            date_format: default_date_format(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Loads the global config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads a config from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Resolves the snapshot directory, preferring an explicit override
    pub fn resolve_state_dir(&self, override_dir: Option<&str>) -> PathBuf {
        if let Some(dir) = override_dir {
            return PathBuf::from(dir);
        }
        match &self.state_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from("."),
        }
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "drift").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_file_missing() {
        let config = Config::default();
        assert_eq!(config.date_format, "%b %-d, %Y");
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(config.state_dir.is_none());
    }

    #[test]
    fn loads_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "date_format = \"%Y-%m-%d\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");
        // untouched fields keep their defaults
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn loads_thresholds_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[thresholds]\nmoderate = 3\nhigh = 5\nextreme = 10\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.thresholds,
            Thresholds {
                moderate: 3,
                high: 5,
                extreme: 10
            }
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "date_format = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn state_dir_override_wins() {
        let config = Config {
            state_dir: Some(PathBuf::from("/configured")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_state_dir(Some("/explicit")),
            PathBuf::from("/explicit")
        );
        assert_eq!(config.resolve_state_dir(None), PathBuf::from("/configured"));

        let bare = Config::default();
        assert_eq!(bare.resolve_state_dir(None), PathBuf::from("."));
    }
}
