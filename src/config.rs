//! Watcher configuration persistence
//!
//! Stores user preferences in `~/.config/keywatch/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keywatch::{Platform, DEFAULT_DEPTH_WARNING};

/// Watcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Tracked depth above which registering a longer sequence logs a warning
    #[serde(default = "default_depth_warning")]
    pub depth_warning: usize,

    /// Platform used for `only<os>` markers; detected when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

fn default_depth_warning() -> usize {
    DEFAULT_DEPTH_WARNING
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            depth_warning: default_depth_warning(),
            platform: None,
        }
    }
}

impl WatchConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load_default() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Platform the watcher should assume
    pub fn effective_platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.depth_warning, 10);
        assert_eq!(config.platform, None);
        assert_eq!(config.effective_platform(), Platform::current());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: WatchConfig = serde_yaml::from_str("platform: mac\n").unwrap();
        assert_eq!(config.depth_warning, 10);
        assert_eq!(config.platform, Some(Platform::Mac));
    }

    #[test]
    fn test_platform_aliases() {
        let config: WatchConfig = serde_yaml::from_str("platform: linux\ndepth_warning: 4\n").unwrap();
        assert_eq!(config.platform, Some(Platform::Unix));
        assert_eq!(config.depth_warning, 4);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = WatchConfig::load(Path::new("/nonexistent/keywatch/config.yaml"));
        assert_eq!(config, WatchConfig::default());
    }
}
