//! Application configuration management

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Visual theme (light/dark)
    pub theme: Theme,
    /// UI language (locale string)
    pub language: String,
    /// Verbose logging
    pub debug: bool,
    /// Recently opened documents
    pub recent_files: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            debug: false,
            recent_files: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "docadjust", "DocAdjust")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk, then overlay environment variables.
    ///
    /// `APP_DEBUG`, `APP_THEME` and `APP_LANG` take precedence over the
    /// config file so a launcher can force a theme or verbose logging.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Overlay `APP_DEBUG` / `APP_THEME` / `APP_LANG` onto this config.
    pub fn apply_env(&mut self) {
        if let Ok(debug) = std::env::var("APP_DEBUG") {
            self.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(theme) = std::env::var("APP_THEME") {
            match theme.to_lowercase().as_str() {
                "dark" => self.theme = Theme::Dark,
                "light" => self.theme = Theme::Light,
                other => tracing::warn!("Ignoring unknown APP_THEME value: {}", other),
            }
        }
        if let Ok(lang) = std::env::var("APP_LANG") {
            if !lang.is_empty() {
                self.language = lang;
            }
        }
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

    /// Add a document to the recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        // Remove if already exists
        self.recent_files.retain(|p| p != &path);
        // Add to front
        self.recent_files.insert(0, path);
        // Keep only last 10
        self.recent_files.truncate(10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_recent_files_dedup_and_cap() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.add_recent_file(PathBuf::from(format!("doc{i}.docx")));
        }
        config.add_recent_file(PathBuf::from("doc5.docx"));

        assert_eq!(config.recent_files.len(), 10);
        assert_eq!(config.recent_files[0], PathBuf::from("doc5.docx"));
        assert_eq!(
            config
                .recent_files
                .iter()
                .filter(|p| **p == PathBuf::from("doc5.docx"))
                .count(),
            1
        );
    }
}
