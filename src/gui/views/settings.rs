//! Settings view implementation
//!
//! Edits the backend URL, the session user and request behaviour, then
//! persists them and reconnects.

use crate::config::{normalize_api_url, validate_timeout, Config};
use crate::gui::app::{GuiApp, GuiSection};
use crate::gui::notifications::{push_notification, NotificationEntry};
use crate::user_settings::UserSettings;
use eframe::egui::{self, RichText};

/// Editable copy of the settings, as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsFormState {
    pub api_url: String,
    pub user_id: String,
    pub timeout_secs: String,
    pub auto_refresh_secs: String,
    pub error: Option<String>,
}

impl SettingsFormState {
    pub fn from_config(config: &Config, settings: &UserSettings) -> Self {
        Self {
            api_url: config.api_url.clone(),
            user_id: config.user_id.clone(),
            timeout_secs: config.request_timeout_secs.to_string(),
            auto_refresh_secs: settings.auto_refresh_secs.to_string(),
            error: None,
        }
    }

    /// Validate the form and write it into `settings`
    pub fn apply_to(&self, settings: &mut UserSettings) -> Result<(), String> {
        let api_url = normalize_api_url(&self.api_url).map_err(|e| e.to_string())?;
        if self.user_id.trim().is_empty() {
            return Err("User id is required".to_string());
        }
        let timeout: u64 = self
            .timeout_secs
            .trim()
            .parse()
            .map_err(|_| "Timeout must be a whole number of seconds".to_string())?;
        validate_timeout(timeout).map_err(|e| e.to_string())?;
        let auto_refresh: u64 = self
            .auto_refresh_secs
            .trim()
            .parse()
            .map_err(|_| "Auto-refresh must be a whole number of seconds (0 = off)".to_string())?;

        settings.set_api_url(&api_url);
        settings.set_user_id(&self.user_id);
        settings.request_timeout_secs = Some(timeout);
        settings.auto_refresh_secs = auto_refresh;
        Ok(())
    }
}

impl GuiApp {
    pub(crate) fn view_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(self.theme.spacing_sm);

        let theme = self.theme;
        let mut save = false;
        let mut reset = false;
        let form = &mut self.settings_form;

        theme.frame_panel().show(ui, |ui| {
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([theme.spacing_md, theme.spacing_sm])
                .show(ui, |ui| {
                    ui.label("API URL:");
                    ui.text_edit_singleline(&mut form.api_url);
                    ui.end_row();

                    ui.label("User id:");
                    ui.text_edit_singleline(&mut form.user_id);
                    ui.end_row();

                    ui.label("Request timeout (s):");
                    ui.text_edit_singleline(&mut form.timeout_secs);
                    ui.end_row();

                    ui.label("Auto-refresh (s, 0 = off):");
                    ui.text_edit_singleline(&mut form.auto_refresh_secs);
                    ui.end_row();
                });

            if let Some(error) = &form.error {
                ui.add_space(theme.spacing_xs);
                ui.colored_label(theme.error, error);
            }

            ui.add_space(theme.spacing_sm);
            ui.horizontal(|ui| {
                if ui.add(theme.button_primary("Save & Connect")).clicked() {
                    save = true;
                }
                if ui.add(theme.button_secondary("Revert")).clicked() {
                    reset = true;
                }
            });
        });

        ui.add_space(self.theme.spacing_md);
        ui.label(
            RichText::new(format!("Settings file: {}", UserSettings::settings_path_display()))
                .small()
                .color(self.theme.text_secondary),
        );
        ui.label(
            RichText::new(format!("Refund log: {}", crate::operation_log::log_file_path()))
                .small()
                .color(self.theme.text_secondary),
        );

        ui.add_space(self.theme.spacing_sm);
        egui::CollapsingHeader::new("Refund log").show(ui, |ui| {
            match crate::operation_log::read_log() {
                Ok(content) if content.is_empty() => {
                    ui.label(RichText::new("No refunds recorded yet.").color(self.theme.text_secondary));
                }
                Ok(content) => {
                    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                        ui.label(RichText::new(content).monospace().small());
                    });
                }
                Err(e) => {
                    ui.colored_label(self.theme.error, format!("Failed to read log: {}", e));
                }
            }
        });

        if reset {
            self.settings_form = SettingsFormState::from_config(&self.config, &self.user_settings);
        }
        if save {
            self.save_settings();
        }
    }

    fn save_settings(&mut self) {
        let mut settings = self.user_settings.clone();
        if let Err(e) = self.settings_form.apply_to(&mut settings) {
            self.settings_form.error = Some(e);
            return;
        }
        self.settings_form.error = None;

        if let Err(e) = settings.save() {
            tracing::warn!("Failed to save settings: {}", e);
            push_notification(
                &mut self.notifications,
                NotificationEntry::error(format!("[!!] Failed to save settings: {}", e)),
            );
        }
        self.config.apply_settings(&settings);
        self.user_settings = settings;

        self.connect();
        match &self.setup_error {
            None => {
                push_notification(&mut self.notifications, NotificationEntry::new("Settings saved, reloading transactions."));
                self.section = GuiSection::Transactions;
            }
            Some(e) => self.settings_form.error = Some(e.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SettingsFormState {
        SettingsFormState {
            api_url: "https://shop.example.com/api/".to_string(),
            user_id: " 12 ".to_string(),
            timeout_secs: "20".to_string(),
            auto_refresh_secs: "0".to_string(),
            error: None,
        }
    }

    #[test]
    fn test_apply_valid_form() {
        let mut settings = UserSettings::default();
        valid_form().apply_to(&mut settings).unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("https://shop.example.com/api"));
        assert_eq!(settings.user_id.as_deref(), Some("12"));
        assert_eq!(settings.request_timeout_secs, Some(20));
        assert_eq!(settings.auto_refresh_secs, 0);
    }

    #[test]
    fn test_apply_rejects_bad_url() {
        let mut form = valid_form();
        form.api_url = "shop".to_string();
        let mut settings = UserSettings::default();
        assert!(form.apply_to(&mut settings).is_err());
        assert_eq!(settings, UserSettings::default());
    }

    #[test]
    fn test_apply_rejects_blank_user() {
        let mut form = valid_form();
        form.user_id = "  ".to_string();
        let err = form.apply_to(&mut UserSettings::default()).unwrap_err();
        assert_eq!(err, "User id is required");
    }

    #[test]
    fn test_apply_rejects_zero_timeout() {
        let mut form = valid_form();
        form.timeout_secs = "0".to_string();
        assert!(form.apply_to(&mut UserSettings::default()).is_err());
    }

    #[test]
    fn test_apply_rejects_non_numeric_auto_refresh() {
        let mut form = valid_form();
        form.auto_refresh_secs = "often".to_string();
        assert!(form.apply_to(&mut UserSettings::default()).is_err());
    }

    #[test]
    fn test_from_config_prefills_form() {
        let config = Config::new("https://a.example.com".to_string(), "5".to_string());
        let mut settings = UserSettings::default();
        settings.auto_refresh_secs = 30;
        let form = SettingsFormState::from_config(&config, &settings);
        assert_eq!(form.api_url, "https://a.example.com");
        assert_eq!(form.user_id, "5");
        assert_eq!(form.timeout_secs, "15");
        assert_eq!(form.auto_refresh_secs, "30");
    }
}
