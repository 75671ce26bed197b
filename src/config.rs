//! Configuration types for the launcher.

use std::path::{Path, PathBuf};

use quicklaunch_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, Result};
use crate::overlay::Shortcut;

/// Top-level launcher configuration, stored as TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Aggregation engine and ranking tunables.
    pub search: SearchConfig,
    /// Host transport settings.
    pub host: HostConfig,
    /// Overlay window settings.
    pub overlay: OverlayConfig,
}

/// Host transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Bounded request queue between the launcher and the platform side.
    pub request_capacity: usize,
    /// Maximum history entries requested from the platform per lookup.
    pub history_max_results: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            request_capacity: 64,
            history_max_results: 50,
        }
    }
}

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Global shortcut that toggles the overlay, e.g. `cmd+shift+k`.
    pub shortcut: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            shortcut: "cmd+shift+k".to_owned(),
        }
    }
}

impl LauncherConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LauncherError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LauncherError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed, or if
    /// the loaded values fail [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!(path = %default_path.display(), "no config file; using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file path: `<config dir>/quicklaunch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("quicklaunch")
            .join("config.toml")
    }

    /// Checks:
    /// - the search tunables are valid
    /// - `host.request_capacity` and `host.history_max_results` are non-zero
    /// - `overlay.shortcut` parses
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.host.request_capacity == 0 {
            return Err(LauncherError::Config(
                "host.request_capacity must be greater than 0".into(),
            ));
        }
        if self.host.history_max_results == 0 {
            return Err(LauncherError::Config(
                "host.history_max_results must be greater than 0".into(),
            ));
        }
        Shortcut::parse(&self.overlay.shortcut)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LauncherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.host.request_capacity, 64);
        assert_eq!(config.host.history_max_results, 50);
        assert_eq!(config.overlay.shortcut, "cmd+shift+k");
        assert_eq!(config.search.debounce_ms, 150);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = LauncherConfig::default();
        config.search.debounce_ms = 80;
        config.search.history.exclude_search_pages = true;
        config.host.history_max_results = 20;
        config.overlay.shortcut = "ctrl+space".into();

        config.save_to_file(&path).expect("save");
        assert!(path.exists());

        let loaded = LauncherConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndebounce_ms = 200\n").expect("write");

        let loaded = LauncherConfig::from_file(&path).expect("load");
        assert_eq!(loaded.search.debounce_ms, 200);
        assert!((loaded.search.scoring.active_tab_bonus - 0.05).abs() < f64::EPSILON);
        assert_eq!(loaded.host, HostConfig::default());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = LauncherConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(LauncherError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = LauncherConfig::from_file(&path);
        assert!(matches!(result, Err(LauncherError::Config(_))));
    }

    #[test]
    fn load_explicit_path_validates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[host]\nrequest_capacity = 0\n").expect("write");

        let err = LauncherConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("request_capacity"));
    }

    #[test]
    fn validate_rejects_bad_shortcut() {
        let mut config = LauncherConfig::default();
        config.overlay.shortcut = "cmd+hyper+k".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_scoring() {
        let mut config = LauncherConfig::default();
        config.search.scoring.recency_horizon_days = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LauncherError::Search(_)));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = LauncherConfig::default_config_path();
        assert!(path.ends_with("quicklaunch/config.toml"));
    }
}
