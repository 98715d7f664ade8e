//! Application configuration management

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const STORE_FILE: &str = "storage.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the store file; platform data dir when unset
    pub storage_dir: Option<PathBuf>,
    /// Fetch page titles for new bookmarks
    pub fetch_titles: bool,
    /// Show favicons next to bookmarks
    pub show_favicons: bool,
    /// Directory the last export was written to
    pub last_export_dir: Option<PathBuf>,
    /// UI settings
    pub ui: UiConfig,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial window width
    pub window_width: f32,
    /// Initial window height
    pub window_height: f32,
    /// Gap between zone columns
    pub zone_spacing: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            fetch_titles: true,
            show_favicons: true,
            last_export_dir: None,
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 800.0,
            zone_spacing: 12.0,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "startdeck", "Startdeck")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Where the key-value store lives, if anywhere
    pub fn store_path(&self) -> Option<PathBuf> {
        self.storage_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .map(|dir| dir.join(STORE_FILE))
    }

    /// Remember the folder of the last export
    pub fn remember_export(&mut self, file: &std::path::Path) {
        self.last_export_dir = file.parent().map(|p| p.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"fetch_titles": false}"#).unwrap();
        assert!(!config.fetch_titles);
        assert!(config.show_favicons);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_storage_dir_override() {
        let config = AppConfig {
            storage_dir: Some(PathBuf::from("/tmp/deck")),
            ..AppConfig::default()
        };
        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/deck/storage.json")));
    }

    #[test]
    fn test_remember_export() {
        let mut config = AppConfig::default();
        config.remember_export(std::path::Path::new("/home/me/backups/deck.json"));
        assert_eq!(config.last_export_dir, Some(PathBuf::from("/home/me/backups")));
    }
}
