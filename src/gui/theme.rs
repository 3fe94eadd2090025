//! Centralized theme and styling system for the GUI
//!
//! Provides the AppTheme struct with colors, spacing, and styled widget factories.

use eframe::egui;

/// Centralized theme and styling system
#[derive(Clone, Copy)]
pub struct AppTheme {
    // Base colors
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub card_fill: egui::Color32,
    pub card_stroke: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    // Semantic colors
    pub primary: egui::Color32,
    pub success: egui::Color32,
    pub danger: egui::Color32,
    pub error: egui::Color32,

    // Spacing constants
    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,

    // Button sizes
    pub button_small: egui::Vec2,
    pub button_medium: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Light list-on-grey layout
            background: egui::Color32::from_rgb(245, 245, 245),  // #f5f5f5
            surface: egui::Color32::from_rgb(255, 255, 255),
            card_fill: egui::Color32::from_rgb(255, 255, 255),
            card_stroke: egui::Color32::from_rgb(224, 224, 224),
            text_primary: egui::Color32::from_rgb(33, 33, 33),
            text_secondary: egui::Color32::from_rgb(110, 110, 110),

            primary: egui::Color32::from_rgb(0, 123, 255),  // #007bff, refresh tint
            success: egui::Color32::from_rgb(40, 167, 69),
            danger: egui::Color32::from_rgb(220, 53, 69),   // #dc3545, refund button
            error: egui::Color32::from_rgb(200, 35, 51),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 24.0,

            button_small: egui::vec2(80.0, 26.0),
            button_medium: egui::vec2(120.0, 32.0),
        }
    }
}

impl AppTheme {
    /// Create a themed button for the main actions
    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE).strong())
            .fill(self.primary)
            .min_size(self.button_medium)
    }

    /// Filled red button for destructive actions such as refunds
    pub fn button_danger(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE).strong())
            .fill(self.danger)
            .min_size(self.button_small)
    }

    /// Create a themed secondary button (outlined style)
    pub fn button_secondary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.primary))
            .fill(self.surface)
            .stroke(egui::Stroke::new(1.0, self.primary))
            .min_size(self.button_medium)
    }

    /// Frame for a list card
    pub fn frame_card(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.card_fill)
            .rounding(6.0)
            .inner_margin(self.spacing_md)
            .outer_margin(self.spacing_sm) // Card margin
            .stroke(egui::Stroke::new(1.0, self.card_stroke))
    }

    /// Create a themed frame for panels
    pub fn frame_panel(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .rounding(4.0)
            .inner_margin(self.spacing_md)
            .stroke(egui::Stroke::new(1.0, self.card_stroke))
    }
}

/// Configure the egui context style with the given theme
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = egui::Visuals::light();
    visuals.window_fill = theme.surface;
    visuals.panel_fill = theme.background;
    visuals.override_text_color = Some(theme.text_primary);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, theme.card_stroke);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(2.0, theme.primary);
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(18.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(14.0, egui::FontFamily::Proportional),
    );
    ctx.set_style(style);
}
