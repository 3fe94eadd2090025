//! Transactions view implementation
//!
//! Header with refresh/export controls, an inline error line, and the
//! scrollable list of transaction cards with pull-to-refresh.

use crate::gui::app::{GuiApp, GuiSection};
use crate::gui::helpers::build_rows;
use crate::gui::notifications::{push_notification, NotificationEntry};
use crate::gui::widgets::{transaction_card, CardAction};
use crate::screen::Command;
use eframe::egui::{self, RichText};
use std::path::Path;

impl GuiApp {
    /// Main transactions view
    pub(crate) fn view_transactions(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = self.setup_error.clone() {
            self.render_not_connected(ui, &error);
            return;
        }

        let mut refresh = false;
        let mut export = false;
        let refreshing = self.screen.is_refreshing();

        ui.horizontal(|ui| {
            ui.heading("Transactions");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!refreshing, self.theme.button_primary("Refresh"))
                    .on_hover_text("Reload the list (F5)")
                    .clicked()
                {
                    refresh = true;
                }
                if ui
                    .add_enabled(!self.screen.transactions().is_empty(), self.theme.button_secondary("Export CSV"))
                    .clicked()
                {
                    export = true;
                }
                if refreshing {
                    ui.label(RichText::new("Refreshing...").color(self.theme.primary));
                    ui.add(egui::Spinner::new().color(self.theme.primary));
                }
            });
        });

        let mut dismiss_error = false;
        if let Some(error) = self.screen.last_error() {
            ui.horizontal_wrapped(|ui| {
                ui.colored_label(self.theme.error, format!("⚠ {}", error));
                if ui.small_button("Dismiss").clicked() {
                    dismiss_error = true;
                }
            });
        }
        if dismiss_error {
            self.screen.clear_error();
        }

        if self.pull.is_pulling() {
            let progress = self.pull.progress();
            let text = if progress >= 1.0 { "Release to refresh" } else { "Pull to refresh" };
            ui.add(egui::ProgressBar::new(progress).text(text));
        }

        ui.add_space(self.theme.spacing_xs);

        let rows = build_rows(self.screen.transactions());
        let refund_in_flight = self.screen.refund_in_flight();
        let loading = self.screen.is_loading();
        let theme = self.theme;
        let mut refund_clicked = None;

        let output = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if rows.is_empty() {
                    ui.add_space(theme.spacing_lg);
                    ui.vertical_centered(|ui| {
                        let text = if loading { "Loading transactions..." } else { "No transactions yet." };
                        ui.label(RichText::new(text).color(theme.text_secondary));
                    });
                }
                for row in &rows {
                    let pending = refund_in_flight == Some(row.id);
                    let action = transaction_card(ui, &theme, row, refund_in_flight.is_none(), pending);
                    if action == CardAction::Refund {
                        refund_clicked = Some(row.id);
                    }
                }
            });

        self.pull.set_at_top(output.state.offset.y <= 0.5);
        if self.pull.interact(ui, output.inner_rect) && !refreshing {
            refresh = true;
        }

        if refresh {
            self.dispatch(Command::Refresh);
        }
        if let Some(id) = refund_clicked {
            self.dispatch(Command::Refund(id));
        }
        if export {
            self.export_csv();
        }
    }

    fn render_not_connected(&mut self, ui: &mut egui::Ui, error: &str) {
        ui.add_space(self.theme.spacing_lg);
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Not connected").heading().color(self.theme.error));
            ui.add_space(self.theme.spacing_sm);
            ui.label(error);
            ui.add_space(self.theme.spacing_sm);
            if ui.add(self.theme.button_primary("Open Settings")).clicked() {
                self.section = GuiSection::Settings;
            }
        });
    }

    fn export_csv(&mut self) {
        let dir = Path::new(&self.config.export_directory);
        let entry = match crate::export::export_transactions_csv(self.screen.transactions(), dir) {
            Ok(path) => NotificationEntry::new(format!("Exported transactions to {}", path.display())),
            Err(e) => {
                tracing::warn!("CSV export failed: {:#}", e);
                NotificationEntry::error(format!("[!!] Export failed: {:#}", e))
            }
        };
        push_notification(&mut self.notifications, entry);
    }
}
