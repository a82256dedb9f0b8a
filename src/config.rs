//! Configuration for the discfs CLI

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool configuration
///
/// The library itself is configured through `DiscOptions`; this is the
/// persisted layer the command-line tool reads its defaults from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Device or mounted disc root opened when none is given on the command line
    pub device_path: Option<PathBuf>,

    /// Overlay directory applied right after open
    pub overlay_root: Option<PathBuf>,

    /// Key file handed to the protection module
    pub key_file: Option<PathBuf>,

    /// Directory cached files are materialized under
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("discfs");

        Config {
            device_path: None,
            overlay_root: None,
            key_file: None,
            cache_dir,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("discfs")
            .join("config.json")
    }

    /// Load configuration from a file, with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("failed to read config file: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config file: {}", e)))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(overlay) = std::env::var("DISCFS_OVERLAY") {
            let overlay = overlay.trim();
            if !overlay.is_empty() {
                self.overlay_root = Some(PathBuf::from(overlay));
            }
        }

        if let Ok(key_file) = std::env::var("DISCFS_KEY_FILE") {
            let key_file = key_file.trim();
            if !key_file.is_empty() {
                self.key_file = Some(PathBuf::from(key_file));
            }
        }

        if let Ok(cache_dir) = std::env::var("DISCFS_CACHE_DIR") {
            let cache_dir = cache_dir.trim();
            if !cache_dir.is_empty() {
                self.cache_dir = PathBuf::from(cache_dir);
            }
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::Config(format!("failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.device_path = Some(PathBuf::from("/dev/sr0"));
        config.overlay_root = Some(PathBuf::from("/tmp/overlay"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.device_path, config.device_path);
        assert_eq!(loaded.overlay_root, config.overlay_root);
        assert_eq!(loaded.cache_dir, config.cache_dir);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(Config::load(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_default_has_cache_dir() {
        let config = Config::default();
        assert!(config.cache_dir.ends_with("discfs"));
        assert!(config.device_path.is_none());
    }
}
