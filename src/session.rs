//! Session context: who is looking at the screen.

use crate::config::{Config, ConfigError};
use crate::types::UserId;

/// The signed-in user for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    user_id: UserId,
}

impl UserSession {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Build the session from configuration; a blank user id is rejected
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let raw = config.user_id.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingUserId);
        }
        Ok(Self::new(UserId::new(raw)))
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_trims_user_id() {
        let mut config = Config::default();
        config.user_id = "  user-17 ".to_string();
        let session = UserSession::from_config(&config).unwrap();
        assert_eq!(session.user_id().as_str(), "user-17");
    }

    #[test]
    fn test_from_config_blank_user_id_rejected() {
        let mut config = Config::default();
        config.user_id = "   ".to_string();
        assert_eq!(UserSession::from_config(&config), Err(ConfigError::MissingUserId));
    }
}
