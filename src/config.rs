use std::env;
use thiserror::Error;
use url::Url;

/// Default backend used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Upper bound accepted for the request timeout
pub const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("No user id configured (set TXDESK_USER_ID or enter one in Settings)")]
    MissingUserId,
    #[error("Request timeout must be between 1 and 300 seconds, got {0}")]
    InvalidTimeout(u64),
}

/// Validate and normalise a backend base URL (http/https only, no trailing slash)
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidApiUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(ConfigError::InvalidApiUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

pub fn validate_timeout(secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        Err(ConfigError::InvalidTimeout(secs))
    } else {
        Ok(secs)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub user_id: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub export_directory: String,  // Directory for saving exported CSV files
}

impl Config {
    pub fn new(api_url: String, user_id: String) -> Self {
        // Default export directory to user's documents or current directory
        let export_directory = dirs::document_dir()
            .map(|docs| docs.join("TxDesk").to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            api_url,
            user_id,
            api_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_directory,
        }
    }

    /// Build the configuration from `TXDESK_*` environment variables
    pub fn from_env() -> Self {
        let api_url = env::var("TXDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let user_id = env::var("TXDESK_USER_ID").unwrap_or_default();
        let mut config = Self::new(api_url, user_id);

        config.api_token = env::var("TXDESK_API_TOKEN").ok().filter(|t| !t.trim().is_empty());
        if let Some(secs) = env::var("TXDESK_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()) {
            config.request_timeout_secs = secs;
        }
        if let Ok(dir) = env::var("TXDESK_EXPORT_DIR") {
            if !dir.trim().is_empty() {
                config.export_directory = dir;
            }
        }
        config
    }

    /// Overlay persisted user settings on top of this configuration
    pub fn apply_settings(&mut self, settings: &crate::user_settings::UserSettings) {
        if let Some(url) = settings.api_url.as_ref().filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(user) = settings.user_id.as_ref().filter(|u| !u.trim().is_empty()) {
            self.user_id = user.trim().to_string();
        }
        if let Some(secs) = settings.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
    }

    /// Check every field and normalise the API URL in place
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.api_url = normalize_api_url(&self.api_url)?;
        validate_timeout(self.request_timeout_secs)?;
        if self.user_id.trim().is_empty() {
            return Err(ConfigError::MissingUserId);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string(), String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_settings::UserSettings;

    // ==================== normalize_api_url tests ====================

    #[test]
    fn test_normalize_api_url_strips_trailing_slash() {
        assert_eq!(
            normalize_api_url(" https://shop.example.com/api/ ").unwrap(),
            "https://shop.example.com/api"
        );
    }

    #[test]
    fn test_normalize_api_url_rejects_garbage() {
        assert!(matches!(
            normalize_api_url("not a url"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_normalize_api_url_rejects_other_schemes() {
        let err = normalize_api_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    // ==================== validate_timeout tests ====================

    #[test]
    fn test_validate_timeout_bounds() {
        assert_eq!(validate_timeout(1), Ok(1));
        assert_eq!(validate_timeout(MAX_TIMEOUT_SECS), Ok(MAX_TIMEOUT_SECS));
        assert_eq!(validate_timeout(0), Err(ConfigError::InvalidTimeout(0)));
        assert_eq!(validate_timeout(301), Err(ConfigError::InvalidTimeout(301)));
    }

    // ==================== Config tests ====================

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.user_id.is_empty());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_config_validate_requires_user() {
        let mut config = Config::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingUserId));
    }

    #[test]
    fn test_config_validate_normalizes_url() {
        let mut config = Config::new("https://shop.example.com/api/".to_string(), "7".to_string());
        config.validate().unwrap();
        assert_eq!(config.api_url, "https://shop.example.com/api");
    }

    #[test]
    fn test_apply_settings_overrides_fields() {
        let mut config = Config::default();
        let mut settings = UserSettings::default();
        settings.api_url = Some("https://other.example.com".to_string());
        settings.user_id = Some(" 42 ".to_string());
        settings.request_timeout_secs = Some(30);

        config.apply_settings(&settings);

        assert_eq!(config.api_url, "https://other.example.com");
        assert_eq!(config.user_id, "42");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_apply_settings_blank_values_ignored() {
        let mut config = Config::new("https://env.example.com".to_string(), "env-user".to_string());
        let mut settings = UserSettings::default();
        settings.api_url = Some("  ".to_string());
        settings.user_id = Some(String::new());

        config.apply_settings(&settings);

        assert_eq!(config.api_url, "https://env.example.com");
        assert_eq!(config.user_id, "env-user");
    }
}
