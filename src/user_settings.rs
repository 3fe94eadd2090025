use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "txdesk_settings.json";

fn default_auto_refresh_secs() -> u64 {
    0 // Disabled
}

/// User settings that persist between sessions
///
/// `None` fields fall back to the environment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    /// Base URL of the transactions API
    #[serde(default)]
    pub api_url: Option<String>,
    /// User whose transactions are shown
    #[serde(default)]
    pub user_id: Option<String>,
    /// Per-request timeout override (seconds)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Periodic refresh interval in seconds (0 = off)
    #[serde(default = "default_auto_refresh_secs")]
    pub auto_refresh_secs: u64,
}

/// Directory where app data (settings, operation log) is stored
pub(crate) fn app_data_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("txdesk");
        if !app_dir.exists() {
            let _ = fs::create_dir_all(&app_dir);
        }
        app_dir
    } else {
        // Fall back to current directory
        PathBuf::from(".")
    }
}

impl UserSettings {
    /// Get the settings file path
    fn settings_path() -> PathBuf {
        app_data_dir().join(SETTINGS_FILE)
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file: {}", e);
                }
            }
        }
        tracing::info!("Using default settings");
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Get the settings file path for display
    pub fn settings_path_display() -> String {
        Self::settings_path().display().to_string()
    }

    /// Set the API URL override (blank clears it)
    pub fn set_api_url(&mut self, url: &str) {
        self.api_url = non_blank(url);
    }

    /// Set the user id override (blank clears it)
    pub fn set_user_id(&mut self, user_id: &str) {
        self.user_id = non_blank(user_id);
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
